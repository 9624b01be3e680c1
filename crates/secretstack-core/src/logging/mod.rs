//! Logging abstractions
//!
//! The store logs through an injectable [`Logger`]; the default
//! [`TracingLogger`] forwards to `tracing`.

mod traits;
mod noop;
mod tracing_logger;

pub use traits::{Logger, LoggerExt, SharedLogger};
pub use noop::NoOpLogger;
pub use tracing_logger::{TracingLogger, DEFAULT_TARGET};
