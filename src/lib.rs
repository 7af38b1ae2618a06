//! AgentFlow Rust Library
//!
//! Este crate actúa como la librería central de AgentFlow:
//! - Expone `config` para leer la configuración `AGENTFLOW_*`.
//! - Expone `app::AppContext`, que conecta el executor de `flow-core`, el
//!   canal de `flow-adapters` y el vault de `flow-credentials`.
//! - Expone `errors` con el error de nivel aplicación.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod app;
pub mod config;
pub mod errors;
pub mod logging;

pub use app::AppContext;
pub use config::AppConfig;
pub use errors::CoreError;
