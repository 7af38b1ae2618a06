//! `CompositeSink`: publica en una secuencia de sinks, en orden.
//!
//! Un sink que falla no impide la entrega al resto; se devuelve el primer
//! error observado.
use std::sync::Arc;

use flow_core::{EventSink, SinkError, WorkflowStatusEvent};
use log::debug;

#[derive(Default)]
pub struct CompositeSink {
    pub sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self { sinks: vec![] }
    }

    pub fn with_sinks(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    /// Añade un sink al final de la cadena.
    pub fn push(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for CompositeSink {
    fn publish(&self, event: &WorkflowStatusEvent) -> Result<(), SinkError> {
        let mut first_err = None;
        for (i, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = sink.publish(event) {
                debug!("composite:sink {i} failed: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
