//! Builder para `WorkflowExecutor`.
//!
//! ```ignore
//! let executor = WorkflowExecutor::builder(sink, runner)
//!     .step_timeout(Duration::from_secs(30))
//!     .build();
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::engine::WorkflowExecutor;
use crate::event::EventSink;
use crate::step::StepRunner;

pub struct ExecutorBuilder<S: ?Sized, R: ?Sized> {
    sink: Arc<S>,
    runner: Arc<R>,
    step_timeout: Option<Duration>,
}

impl<S, R> ExecutorBuilder<S, R>
    where S: EventSink + ?Sized + 'static,
          R: StepRunner + ?Sized + 'static
{
    pub fn new(sink: Arc<S>, runner: Arc<R>) -> Self {
        Self { sink,
               runner,
               step_timeout: None }
    }

    /// Límite por step; al excederse el step falla con `StepError::Timeout`.
    #[inline]
    pub fn step_timeout(mut self, limit: Duration) -> Self {
        self.step_timeout = Some(limit);
        self
    }

    /// Variante para valores opcionales leídos de configuración.
    #[inline]
    pub fn maybe_step_timeout(mut self, limit: Option<Duration>) -> Self {
        self.step_timeout = limit;
        self
    }

    #[inline]
    pub fn build(self) -> WorkflowExecutor<S, R> {
        WorkflowExecutor::with_timeout(self.sink, self.runner, self.step_timeout)
    }
}
