//! Core WorkflowExecutor implementation

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::engine::{ExecutorBuilder, RunHandle, RunState};
use crate::errors::{ExecutorError, StepError};
use crate::event::{EventSink, WorkflowStatusEvent};
use crate::model::{Step, Workflow};
use crate::step::{StepContext, StepOutput, StepRunner};

/// Resumen de una ejecución completada.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub workflow_id: String,
    pub run_id: Uuid,
    pub steps_completed: usize,
    /// Salidas de cada step, en orden.
    pub outputs: Vec<StepOutput>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Ejecutor secuencial de workflows con notificación de estado.
///
/// Cada ejecución recorre los steps en orden, publica un evento antes y
/// después de cada uno y termina con un único evento terminal. El executor no
/// guarda estado entre ejecuciones, así que varias ejecuciones pueden
/// correr en paralelo compartiendo el mismo sink y runner.
pub struct WorkflowExecutor<S: ?Sized, R: ?Sized> {
    sink: Arc<S>,
    runner: Arc<R>,
    step_timeout: Option<Duration>,
}

impl<S, R> WorkflowExecutor<S, R>
    where S: EventSink + ?Sized + 'static,
          R: StepRunner + ?Sized + 'static
{
    /// Crea un builder para configurar el executor
    #[inline]
    pub fn builder(sink: Arc<S>, runner: Arc<R>) -> ExecutorBuilder<S, R> {
        ExecutorBuilder::new(sink, runner)
    }

    pub fn new(sink: Arc<S>, runner: Arc<R>) -> Self {
        Self::with_timeout(sink, runner, None)
    }

    pub(crate) fn with_timeout(sink: Arc<S>, runner: Arc<R>, step_timeout: Option<Duration>) -> Self {
        Self { sink,
               runner,
               step_timeout }
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout
    }

    /// Ejecuta el workflow hasta un estado terminal.
    pub async fn execute_workflow(&self, workflow: &Workflow) -> Result<RunSummary, ExecutorError> {
        self.execute_with_cancel(workflow, &CancellationToken::new()).await
    }

    /// Igual que `execute_workflow`, observando `cancel` entre steps.
    pub async fn execute_with_cancel(&self,
                                     workflow: &Workflow,
                                     cancel: &CancellationToken)
                                     -> Result<RunSummary, ExecutorError> {
        self.run(workflow, Uuid::new_v4(), cancel).await
    }

    /// Lanza la ejecución en una tarea tokio y devuelve su handle.
    pub fn spawn(self: &Arc<Self>, workflow: Workflow) -> RunHandle {
        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let executor = Arc::clone(self);
        let join = tokio::spawn(async move { executor.run(&workflow, run_id, &token).await });
        RunHandle::new(run_id, cancel, join)
    }

    async fn run(&self,
                 workflow: &Workflow,
                 run_id: Uuid,
                 cancel: &CancellationToken)
                 -> Result<RunSummary, ExecutorError> {
        // entrada inválida: ningún evento
        workflow.validate()?;

        let total = workflow.len();
        let started_at = Utc::now();
        let mut state = RunState::default();
        let mut outputs = Vec::with_capacity(total);

        info!("workflow:start id={} run={run_id} name={} steps={total}",
              workflow.id,
              workflow.display_name());
        state.start()?;
        self.emit(WorkflowStatusEvent::started(workflow, run_id));

        for (pos, step) in workflow.steps.iter().enumerate() {
            let index = pos + 1;
            if cancel.is_cancelled() {
                state.cancel()?;
                let completed_steps = state.completed_steps();
                warn!("workflow:cancelled id={} run={run_id} completed={completed_steps}/{total}",
                      workflow.id);
                self.emit(WorkflowStatusEvent::cancelled(workflow, run_id, completed_steps));
                return Err(ExecutorError::Cancelled { completed_steps });
            }

            self.emit(WorkflowStatusEvent::step_started(workflow, run_id, index, step));
            debug!("step:start id={} run={run_id} step={index}/{total} name={}", workflow.id, step.name);

            let ctx = StepContext { workflow_id: workflow.id.clone(),
                                    run_id,
                                    index,
                                    total };
            match self.run_step(step, &ctx).await {
                Ok(out) => {
                    state.step_succeeded()?;
                    outputs.push(out);
                    self.emit(WorkflowStatusEvent::step_finished(workflow, run_id, index, step));
                    debug!("step:done id={} run={run_id} step={index}/{total}", workflow.id);
                }
                Err(source) => {
                    let reason = source.to_string();
                    state.fail(reason.clone())?;
                    error!("step:failed id={} run={run_id} step={index}/{total} name={} err={reason}",
                           workflow.id,
                           step.name);
                    self.emit(WorkflowStatusEvent::failed(workflow, run_id, index, step, &reason));
                    return Err(ExecutorError::StepFailed { step: index,
                                                           name: step.name.clone(),
                                                           source });
                }
            }
        }

        state.finish(total)?;
        self.emit(WorkflowStatusEvent::completed(workflow, run_id));
        info!("workflow:completed id={} run={run_id}", workflow.id);

        Ok(RunSummary { workflow_id: workflow.id.clone(),
                        run_id,
                        steps_completed: total,
                        outputs,
                        started_at,
                        finished_at: Utc::now() })
    }

    /// Un panic del runner se reporta como fallo del step, así el evento
    /// terminal se publica igual.
    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError> {
        let guarded = AssertUnwindSafe(self.runner.run(step, ctx)).catch_unwind()
                                                                  .map(|res| res.unwrap_or_else(|p| Err(panicked(p))));
        match self.step_timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(res) => res,
                Err(_) => Err(StepError::Timeout(limit)),
            },
            None => guarded.await,
        }
    }

    /// Publicación best-effort: un sink caído no detiene la ejecución.
    fn emit(&self, event: WorkflowStatusEvent) {
        if let Err(e) = self.sink.publish(&event) {
            warn!("publish failed workflow_id={} run={} event={} err={e}",
                  event.workflow_id,
                  event.run_id,
                  event.signature());
        }
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> StepError {
    let detail = payload.downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
    StepError::Failed(format!("panicked: {detail}"))
}
