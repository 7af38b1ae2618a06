use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("encryption failed")]
    Encrypt,
    #[error("decryption failed (wrong user or corrupted data)")]
    Decrypt,
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("serialization: {0}")]
    Serialization(String),
}
