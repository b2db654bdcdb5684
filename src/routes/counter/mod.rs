mod handler;
mod model;

pub use handler::{get_counts, hit, usage};
pub use model::{CounterQuery, CounterView, resolve_key};
