use std::sync::Mutex;

use super::WorkflowStatusEvent;
use crate::errors::SinkError;

/// Destino de publicación de eventos de estado (fire-and-forget).
///
/// `publish` no debe bloquear a la ejecución esperando a listeners lentos.
/// Debe tolerar llamadas concurrentes desde varias ejecuciones en vuelo.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &WorkflowStatusEvent) -> Result<(), SinkError>;
}

/// Colector en memoria, pensado para tests y para inspección local.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    inner: Mutex<Vec<WorkflowStatusEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de todos los eventos recibidos, en orden de publicación.
    pub fn events(&self) -> Vec<WorkflowStatusEvent> {
        self.lock().clone()
    }

    /// Eventos de un `workflow_id` concreto (orden de publicación).
    pub fn events_for(&self, workflow_id: &str) -> Vec<WorkflowStatusEvent> {
        self.lock().iter().filter(|e| e.workflow_id == workflow_id).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WorkflowStatusEvent>> {
        // un panic en otro hilo no invalida los eventos ya recolectados
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: &WorkflowStatusEvent) -> Result<(), SinkError> {
        self.lock().push(event.clone());
        Ok(())
    }
}
