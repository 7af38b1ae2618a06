//! Máquina de estados de una ejecución.
//!
//! Transiciones válidas:
//! - `NotStarted` -> `Running { cursor: 0 }`
//! - `Running { cursor: i }` -> `Running { cursor: i + 1 }` (step i+1 ok)
//! - `Running { cursor: total }` -> `Completed`
//! - `Running { cursor: i }` -> `Failed { step: i + 1, .. }`
//! - `Running { cursor: i }` -> `Cancelled { completed_steps: i }`
//!
//! `Completed`, `Failed` y `Cancelled` son terminales: no hay reanudación.
use crate::errors::ExecutorError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    NotStarted,
    /// `cursor` = cantidad de steps ya terminados (índice 0-based del siguiente).
    Running { cursor: usize },
    Completed,
    /// `step` es 1-indexed, igual que en los eventos.
    Failed { step: usize, error: String },
    Cancelled { completed_steps: usize },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. } | Self::Cancelled { .. })
    }

    pub fn start(&mut self) -> Result<(), ExecutorError> {
        match self {
            Self::NotStarted => {
                *self = Self::Running { cursor: 0 };
                Ok(())
            }
            other => Err(invalid("start", other)),
        }
    }

    /// Marca el step actual como terminado y devuelve el nuevo cursor.
    pub fn step_succeeded(&mut self) -> Result<usize, ExecutorError> {
        match self {
            Self::Running { cursor } => {
                *cursor += 1;
                Ok(*cursor)
            }
            other => Err(invalid("step_succeeded", other)),
        }
    }

    /// Cierra la ejecución; exige que se hayan completado los `total` steps.
    pub fn finish(&mut self, total: usize) -> Result<(), ExecutorError> {
        match self {
            Self::Running { cursor } if *cursor == total => {
                *self = Self::Completed;
                Ok(())
            }
            other => Err(invalid("finish", other)),
        }
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), ExecutorError> {
        match self {
            Self::Running { cursor } => {
                *self = Self::Failed { step: *cursor + 1,
                                       error: error.into() };
                Ok(())
            }
            other => Err(invalid("fail", other)),
        }
    }

    pub fn cancel(&mut self) -> Result<(), ExecutorError> {
        match self {
            Self::Running { cursor } => {
                *self = Self::Cancelled { completed_steps: *cursor };
                Ok(())
            }
            other => Err(invalid("cancel", other)),
        }
    }

    /// Steps terminados con éxito hasta el momento.
    pub fn completed_steps(&self) -> usize {
        match self {
            Self::NotStarted | Self::Completed => 0,
            Self::Running { cursor } => *cursor,
            Self::Failed { step, .. } => step.saturating_sub(1),
            Self::Cancelled { completed_steps } => *completed_steps,
        }
    }
}

fn invalid(op: &str, state: &RunState) -> ExecutorError {
    ExecutorError::InvalidTransition(format!("{op} from {state:?}"))
}
