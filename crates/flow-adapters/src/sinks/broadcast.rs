//! `BroadcastHub`: canal push en memoria sobre `tokio::sync::broadcast`.
//!
//! Semántica de entrega:
//! - fire-and-forget, a lo sumo una vez por listener conectado en el momento
//!   de publicar; quien se suscribe después no recibe eventos anteriores;
//! - capacidad acotada: un listener lento pierde los eventos más viejos y se
//!   le informa la cantidad saltada; `publish` nunca espera;
//! - publicar sin listeners no es un error;
//! - tras `close()` publicar falla con `SinkError::ChannelUnavailable` y los
//!   listeners reciben `None` al vaciar su cola.
use std::sync::{Arc, RwLock};

use flow_core::constants::{DEFAULT_BROADCAST_CAPACITY, WORKFLOW_STATUS_EVENT};
use flow_core::{EventSink, SinkError, WorkflowStatusEvent};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Mensaje del canal: nombre del evento + payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusFrame {
    pub event: String,
    pub payload: WorkflowStatusEvent,
}

impl StatusFrame {
    pub fn new(payload: WorkflowStatusEvent) -> Self {
        Self { event: WORKFLOW_STATUS_EVENT.to_string(),
               payload }
    }

    pub fn to_json(&self) -> Result<String, SinkError> {
        serde_json::to_string(self).map_err(|e| SinkError::Serialization(e.to_string()))
    }
}

pub struct BroadcastHub {
    sender: RwLock<Option<broadcast::Sender<Arc<StatusFrame>>>>,
    capacity: usize,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        // tokio no admite capacidad 0
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self { sender: RwLock::new(Some(sender)),
               capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Nuevo listener; sólo verá eventos publicados desde ahora.
    pub fn subscribe(&self) -> Result<Subscription, SinkError> {
        let guard = self.sender.read().unwrap_or_else(|p| p.into_inner());
        match guard.as_ref() {
            Some(tx) => Ok(Subscription { rx: tx.subscribe(),
                                          skipped: 0 }),
            None => Err(closed()),
        }
    }

    /// Listeners conectados en este momento.
    pub fn receiver_count(&self) -> usize {
        let guard = self.sender.read().unwrap_or_else(|p| p.into_inner());
        guard.as_ref().map(|tx| tx.receiver_count()).unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().unwrap_or_else(|p| p.into_inner()).is_none()
    }

    /// Cierra el canal. Idempotente.
    pub fn close(&self) {
        let mut guard = self.sender.write().unwrap_or_else(|p| p.into_inner());
        if guard.take().is_some() {
            debug!("broadcast:closed");
        }
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_CAPACITY)
    }
}

impl EventSink for BroadcastHub {
    fn publish(&self, event: &WorkflowStatusEvent) -> Result<(), SinkError> {
        let guard = self.sender.read().unwrap_or_else(|p| p.into_inner());
        let tx = guard.as_ref().ok_or_else(closed)?;
        match tx.send(Arc::new(StatusFrame::new(event.clone()))) {
            Ok(n) => debug!("broadcast:sent workflow_id={} event={} listeners={n}",
                            event.workflow_id,
                            event.signature()),
            // sin listeners: nadie a quien entregar, no es un fallo
            Err(_) => debug!("broadcast:no listeners workflow_id={} event={}",
                             event.workflow_id,
                             event.signature()),
        }
        Ok(())
    }
}

fn closed() -> SinkError {
    SinkError::ChannelUnavailable("broadcast hub closed".into())
}

/// Listener de un `BroadcastHub`.
pub struct Subscription {
    rx: broadcast::Receiver<Arc<StatusFrame>>,
    skipped: u64,
}

impl Subscription {
    /// Próximo frame. Salta por encima de los eventos perdidos por lag;
    /// `None` cuando el hub se cerró y la cola está vacía.
    pub async fn recv(&mut self) -> Option<Arc<StatusFrame>> {
        loop {
            match self.rx.recv().await {
                Ok(frame) => return Some(frame),
                Err(RecvError::Lagged(n)) => self.note_lag(n),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Variante no bloqueante: `None` si no hay nada pendiente.
    pub fn try_recv(&mut self) -> Option<Arc<StatusFrame>> {
        loop {
            match self.rx.try_recv() {
                Ok(frame) => return Some(frame),
                Err(TryRecvError::Lagged(n)) => self.note_lag(n),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Total de eventos perdidos por ir atrasado.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn note_lag(&mut self, n: u64) {
        warn!("broadcast:listener lagged, skipped={n}");
        self.skipped += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{Step, Workflow};
    use uuid::Uuid;

    fn event(id: &str) -> WorkflowStatusEvent {
        WorkflowStatusEvent::started(&Workflow::new(id, vec![Step::new("a")]), Uuid::new_v4())
    }

    #[tokio::test]
    async fn fans_out_to_every_listener() {
        let hub = BroadcastHub::new(8);
        let mut l1 = hub.subscribe().unwrap();
        let mut l2 = hub.subscribe().unwrap();
        assert_eq!(hub.receiver_count(), 2);

        hub.publish(&event("wf")).unwrap();

        for l in [&mut l1, &mut l2] {
            let frame = l.recv().await.expect("frame");
            assert_eq!(frame.event, "workflow_status");
            assert_eq!(frame.payload.workflow_id, "wf");
        }
    }

    #[test]
    fn late_listeners_miss_earlier_events() {
        let hub = BroadcastHub::new(8);
        hub.publish(&event("early")).unwrap();
        let mut late = hub.subscribe().unwrap();
        assert!(late.try_recv().is_none());
    }

    #[test]
    fn publishing_without_listeners_is_ok() {
        let hub = BroadcastHub::default();
        assert_eq!(hub.capacity(), DEFAULT_BROADCAST_CAPACITY);
        assert!(hub.publish(&event("nobody")).is_ok());
    }

    #[test]
    fn slow_listener_skips_oldest_events() {
        let hub = BroadcastHub::new(2);
        let mut slow = hub.subscribe().unwrap();
        for id in ["e1", "e2", "e3", "e4"] {
            hub.publish(&event(id)).unwrap();
        }
        let first = slow.try_recv().expect("newest frames remain");
        assert_eq!(first.payload.workflow_id, "e3");
        assert_eq!(slow.skipped(), 2);
        assert_eq!(slow.try_recv().unwrap().payload.workflow_id, "e4");
        assert!(slow.try_recv().is_none());
    }

    #[tokio::test]
    async fn close_rejects_publish_and_ends_listeners() {
        let hub = BroadcastHub::new(4);
        let mut l = hub.subscribe().unwrap();
        hub.publish(&event("last")).unwrap();
        hub.close();
        hub.close();

        assert!(hub.is_closed());
        assert!(matches!(hub.publish(&event("x")), Err(SinkError::ChannelUnavailable(_))));
        assert!(hub.subscribe().is_err());
        assert_eq!(l.recv().await.unwrap().payload.workflow_id, "last");
        assert!(l.recv().await.is_none());
    }

    #[test]
    fn frame_serializes_with_event_name() {
        let json = StatusFrame::new(event("wf")).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["event"], "workflow_status");
        assert_eq!(v["payload"]["workflowId"], "wf");
        assert_eq!(v["payload"]["status"], "started");
    }
}
