/// 缓存操作
/// 计数器的读写流程

pub mod counter;

pub use counter::{CounterCacheOperations, Counts};
