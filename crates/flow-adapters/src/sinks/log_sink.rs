use flow_core::constants::WORKFLOW_STATUS_EVENT;
use flow_core::{EventSink, SinkError, WorkflowStatus, WorkflowStatusEvent};
use log::{info, warn};

/// Escribe cada evento en el log operativo (`log` facade).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &WorkflowStatusEvent) -> Result<(), SinkError> {
        match event.status {
            WorkflowStatus::Failed | WorkflowStatus::Cancelled => {
                warn!("[{WORKFLOW_STATUS_EVENT}] workflow_id={} run={} {}",
                      event.workflow_id,
                      event.run_id,
                      event.message)
            }
            _ => info!("[{WORKFLOW_STATUS_EVENT}] workflow_id={} run={} {}",
                       event.workflow_id,
                       event.run_id,
                       event.message),
        }
        Ok(())
    }
}
