//! `WorkflowStatusEvent`: payload del evento `workflow_status`.
//!
//! Contrato observable del executor:
//! - exactamente un `started` por ejecución;
//! - dos `in_progress` por step (antes y después, el segundo con
//!   `completed: true`), en orden de step;
//! - un único evento terminal: `completed`, `failed` o `cancelled`.
//!
//! Los eventos son efímeros: no se almacenan ni se pueden reproducir.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Step, Workflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Started,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatusEvent {
    pub workflow_id: String,
    /// Distingue dos ejecuciones del mismo `workflow_id`.
    pub run_id: Uuid,
    pub status: WorkflowStatus,
    /// Step 1-indexed; sólo en `in_progress` y `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<usize>,
    pub message: String,
    /// `Some(true)` sólo en el evento posterior de un step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>, // metadato, no participa del orden
}

impl WorkflowStatusEvent {
    fn base(workflow: &Workflow, run_id: Uuid, status: WorkflowStatus, message: String) -> Self {
        Self { workflow_id: workflow.id.clone(),
               run_id,
               status,
               step: None,
               total_steps: None,
               message,
               completed: None,
               error: None,
               timestamp: Utc::now() }
    }

    pub fn started(workflow: &Workflow, run_id: Uuid) -> Self {
        Self::base(workflow,
                   run_id,
                   WorkflowStatus::Started,
                   format!("Workflow {} started.", workflow.display_name()))
    }

    /// Evento previo al trabajo del step `index` (1-indexed).
    pub fn step_started(workflow: &Workflow, run_id: Uuid, index: usize, step: &Step) -> Self {
        let mut ev = Self::base(workflow,
                                run_id,
                                WorkflowStatus::InProgress,
                                format!("Executing step {index}: {}", step.name));
        ev.step = Some(index);
        ev.total_steps = Some(workflow.len());
        ev
    }

    /// Evento posterior al trabajo del step `index` (1-indexed).
    pub fn step_finished(workflow: &Workflow, run_id: Uuid, index: usize, step: &Step) -> Self {
        let mut ev = Self::base(workflow,
                                run_id,
                                WorkflowStatus::InProgress,
                                format!("Step {index}: {} completed.", step.name));
        ev.step = Some(index);
        ev.total_steps = Some(workflow.len());
        ev.completed = Some(true);
        ev
    }

    pub fn completed(workflow: &Workflow, run_id: Uuid) -> Self {
        Self::base(workflow,
                   run_id,
                   WorkflowStatus::Completed,
                   format!("Workflow {} completed successfully.", workflow.display_name()))
    }

    pub fn failed(workflow: &Workflow, run_id: Uuid, index: usize, step: &Step, error: &str) -> Self {
        let mut ev = Self::base(workflow,
                                run_id,
                                WorkflowStatus::Failed,
                                format!("Step {index}: {} failed: {error}", step.name));
        ev.step = Some(index);
        ev.total_steps = Some(workflow.len());
        ev.error = Some(error.to_string());
        ev
    }

    pub fn cancelled(workflow: &Workflow, run_id: Uuid, completed_steps: usize) -> Self {
        Self::base(workflow,
                   run_id,
                   WorkflowStatus::Cancelled,
                   format!("Workflow {} cancelled after {completed_steps} of {} steps.",
                           workflow.display_name(),
                           workflow.len()))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status,
                 WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Cancelled)
    }

    /// Forma compacta para comparar secuencias en tests y logs:
    /// `started`, `step:1`, `step:1:done`, `completed`, `failed:2`, `cancelled`.
    pub fn signature(&self) -> String {
        match (self.status, self.step, self.completed) {
            (WorkflowStatus::Started, ..) => "started".into(),
            (WorkflowStatus::InProgress, Some(i), Some(true)) => format!("step:{i}:done"),
            (WorkflowStatus::InProgress, Some(i), _) => format!("step:{i}"),
            (WorkflowStatus::InProgress, None, _) => "step:?".into(),
            (WorkflowStatus::Completed, ..) => "completed".into(),
            (WorkflowStatus::Failed, Some(i), _) => format!("failed:{i}"),
            (WorkflowStatus::Failed, None, _) => "failed".into(),
            (WorkflowStatus::Cancelled, ..) => "cancelled".into(),
        }
    }
}
