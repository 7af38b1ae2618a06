use flow_core::{ExecutorError, SinkError};
use flow_credentials::CredentialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de ejecución: {0}")]
    Executor(#[from] ExecutorError),
    #[error("Error de canal: {0}")]
    Sink(#[from] SinkError),
    #[error("Error de credenciales: {0}")]
    Credential(#[from] CredentialError),
}
