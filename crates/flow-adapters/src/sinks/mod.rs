//! Sinks de eventos `workflow_status`.

mod broadcast;
mod composite;
mod log_sink;

pub use broadcast::{BroadcastHub, StatusFrame, Subscription};
pub use composite::CompositeSink;
pub use log_sink::LogSink;
