//! Constantes del executor.

/// Nombre del evento en el canal push consumido por el frontend.
pub const WORKFLOW_STATUS_EVENT: &str = "workflow_status";

/// Capacidad por defecto del canal de broadcast (eventos en vuelo por listener).
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;
