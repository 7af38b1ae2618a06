//! Inicialización de `env_logger` para los binarios.
use env_logger::{Builder, Env};

/// Instala el logger global. `RUST_LOG` tiene prioridad sobre `default_filter`.
/// Llamadas repetidas no tienen efecto.
pub fn init(default_filter: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter)).format_timestamp_millis()
                                                                               .try_init();
}

