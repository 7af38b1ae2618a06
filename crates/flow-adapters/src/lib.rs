//! flow-adapters: implementaciones concretas de los puertos de `flow-core`.
//!
//! Este crate provee:
//! - Sinks de eventos: `BroadcastHub` (fan-out tokio a todos los listeners
//!   conectados), `LogSink` (log operativo) y `CompositeSink` (varios sinks en
//!   orden).
//! - Runners de steps: `RandomDelayRunner` (trabajo simulado con un retardo
//!   aleatorio) y `CommandRunner` (ejecuta el `command` del step vía `sh -c`).

pub mod sinks;
pub mod steps;

pub use sinks::{BroadcastHub, CompositeSink, LogSink, StatusFrame, Subscription};
pub use steps::{CommandRunner, RandomDelayRunner};
