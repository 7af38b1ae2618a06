use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::StepError;
use crate::model::Step;

/// Datos de la ejecución visibles para un runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    pub workflow_id: String,
    pub run_id: Uuid,
    /// Posición 1-indexed del step.
    pub index: usize,
    pub total: usize,
}

/// Resultado opcional del trabajo de un step (no viaja en los eventos).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub output: Option<Value>,
}

impl StepOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        Self { output: Some(value) }
    }
}

/// Punto de extensión: el trabajo concreto de cada step.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, step: &Step, ctx: &StepContext) -> Result<StepOutput, StepError>;
}

/// Runner que completa cada step de inmediato.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRunner;

#[async_trait]
impl StepRunner for NoopRunner {
    async fn run(&self, _step: &Step, _ctx: &StepContext) -> Result<StepOutput, StepError> {
        Ok(StepOutput::empty())
    }
}
