//! Eventos de estado y el trait `EventSink`.

mod sink;
mod types;

pub use sink::{EventSink, InMemoryEventSink};
pub use types::{WorkflowStatus, WorkflowStatusEvent};
