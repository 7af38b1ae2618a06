//! Configuración central de la aplicación.
//! Carga `.env` una sola vez y lee las variables `AGENTFLOW_*`.
use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::CoreError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEV_MASTER_SECRET: &str = "agentflow-dev-master-secret";

/// Configuración de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Retardo mínimo del runner simulado.
    pub step_delay_min: Duration,
    pub step_delay_max: Duration,
    /// Límite por step; `None` = sin límite.
    pub step_timeout: Option<Duration>,
    pub broadcast_capacity: usize,
    pub master_secret: String,
    /// Filtro de `env_logger` (p. ej. `info`, `flow_core=debug`).
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { step_delay_min: Duration::from_millis(500),
               step_delay_max: Duration::from_millis(1500),
               step_timeout: None,
               broadcast_capacity: flow_core::constants::DEFAULT_BROADCAST_CAPACITY,
               master_secret: DEV_MASTER_SECRET.to_string(),
               log_filter: "info".to_string() }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de lectura de
    /// variables; las ausentes toman el valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let millis = |key: &str| -> Result<Option<Duration>, CoreError> {
            match lookup(key) {
                Some(raw) => raw.trim()
                                .parse::<u64>()
                                .map(|ms| Some(Duration::from_millis(ms)))
                                .map_err(|_| CoreError::Config(format!("{key} inválido: {raw}"))),
                None => Ok(None),
            }
        };

        let step_delay_min = millis("AGENTFLOW_STEP_DELAY_MIN_MS")?.unwrap_or(defaults.step_delay_min);
        let step_delay_max = millis("AGENTFLOW_STEP_DELAY_MAX_MS")?.unwrap_or(defaults.step_delay_max);
        let step_timeout = millis("AGENTFLOW_STEP_TIMEOUT_MS")?;
        let broadcast_capacity = match lookup("AGENTFLOW_BROADCAST_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(CoreError::Config(format!("AGENTFLOW_BROADCAST_CAPACITY inválido: {raw}"))),
            },
            None => defaults.broadcast_capacity,
        };
        let master_secret = lookup("AGENTFLOW_MASTER_SECRET").filter(|s| !s.is_empty())
                                                             .unwrap_or(defaults.master_secret);
        let log_filter = lookup("AGENTFLOW_LOG").filter(|s| !s.is_empty())
                                                .unwrap_or(defaults.log_filter);

        Ok(Self { step_delay_min,
                  step_delay_max,
                  step_timeout,
                  broadcast_capacity,
                  master_secret,
                  log_filter })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.master_secret == DEV_MASTER_SECRET
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
