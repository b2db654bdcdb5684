mod bot_filter;
mod cors;
mod error_handler;

pub use bot_filter::{bot_filter, is_bot};
pub use cors::{cors, cors_headers};
pub use error_handler::log_errors;
