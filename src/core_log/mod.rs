pub mod logger;

pub use logger::{LogSink, Logger};
