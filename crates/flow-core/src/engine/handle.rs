use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::engine::RunSummary;
use crate::errors::ExecutorError;

/// Handle de una ejecución lanzada con `WorkflowExecutor::spawn`.
///
/// `wait` es la señal de finalización: resuelve con el mismo desenlace que
/// el evento terminal publicado.
#[derive(Debug)]
pub struct RunHandle {
    run_id: Uuid,
    cancel: CancellationToken,
    join: JoinHandle<Result<RunSummary, ExecutorError>>,
}

impl RunHandle {
    pub(crate) fn new(run_id: Uuid,
                      cancel: CancellationToken,
                      join: JoinHandle<Result<RunSummary, ExecutorError>>)
                      -> Self {
        Self { run_id, cancel, join }
    }

    /// `runId` que llevarán todos los eventos de esta ejecución.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Pide la cancelación; se observa antes del siguiente step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn wait(self) -> Result<RunSummary, ExecutorError> {
        match self.join.await {
            Ok(res) => res,
            Err(e) => Err(ExecutorError::Internal(format!("run task aborted: {e}"))),
        }
    }
}
