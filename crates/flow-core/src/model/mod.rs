//! Modelo de datos de entrada del executor.

mod workflow;

pub use workflow::{Step, Workflow};
