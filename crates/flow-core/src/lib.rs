//! flow-core: ejecución secuencial y observable de workflows.
//!
//! Un `WorkflowExecutor` recorre los steps de un `Workflow` en orden, delega
//! el trabajo de cada uno en un `StepRunner` inyectado y publica eventos
//! `workflow_status` en un `EventSink`. Los adaptadores concretos (broadcast,
//! runners de delay o de comandos) viven en `flow-adapters`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod model;
pub mod step;

pub use engine::{ExecutorBuilder, RunHandle, RunState, RunSummary, WorkflowExecutor};
pub use errors::{ExecutorError, SinkError, StepError};
pub use event::{EventSink, InMemoryEventSink, WorkflowStatus, WorkflowStatusEvent};
pub use model::{Step, Workflow};
pub use step::{NoopRunner, StepContext, StepOutput, StepRunner};
