//! Errores del core: ejecución de workflows, steps y sinks de eventos.

use std::time::Duration;

use thiserror::Error;

/// Error terminal de una ejecución (`execute_workflow`).
///
/// El resultado devuelto al caller y el evento terminal emitido al sink
/// describen siempre el mismo desenlace.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Entrada mal formada. Se detecta antes de emitir `started`.
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(String),
    /// El step `step` (1-indexed) falló; la ejecución se detuvo ahí.
    #[error("step {step} ({name}) failed: {source}")]
    StepFailed {
        step: usize,
        name: String,
        #[source]
        source: StepError,
    },
    /// Cancelación cooperativa observada entre steps.
    #[error("workflow cancelled after {completed_steps} completed step(s)")]
    Cancelled { completed_steps: usize },
    #[error("invalid run state transition: {0}")]
    InvalidTransition(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ExecutorError {
    /// Índice (1-indexed) del step que provocó el fallo, si aplica.
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Error producido por un `StepRunner`.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    Failed(String),
    #[error("step timed out after {0:?}")]
    Timeout(Duration),
    #[error("step has no command to run")]
    MissingCommand,
    #[error("command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Error de publicación. Nunca es fatal para la ejecución: el executor lo
/// registra en el log operativo y continúa.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("event channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("event serialization failed: {0}")]
    Serialization(String),
}
