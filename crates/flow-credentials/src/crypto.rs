//! Cifrado por usuario.
//!
//! Clave AES-256 = SHA-256(secreto maestro ‖ user id). Cada llamada a
//! `encrypt` usa un nonce aleatorio de 96 bits que se guarda junto al texto
//! cifrado; los dos viajan en hexadecimal.
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CredentialError;

const NONCE_LEN: usize = 12;

/// Valor cifrado tal como se almacena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedValue {
    pub ciphertext: String,
    pub nonce: String,
}

pub struct UserCipher {
    master_secret: Vec<u8>,
}

impl std::fmt::Debug for UserCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCipher").field("master_secret", &"<redacted>").finish()
    }
}

impl UserCipher {
    pub fn new(master_secret: impl AsRef<[u8]>) -> Self {
        Self { master_secret: master_secret.as_ref().to_vec() }
    }

    fn cipher_for(&self, user_id: &str) -> Result<Aes256Gcm, CredentialError> {
        let mut hasher = Sha256::new();
        hasher.update(&self.master_secret);
        hasher.update(user_id.as_bytes());
        let key = hasher.finalize();
        Aes256Gcm::new_from_slice(&key).map_err(|_| CredentialError::Encrypt)
    }

    pub fn encrypt(&self, plaintext: &str, user_id: &str) -> Result<EncryptedValue, CredentialError> {
        let cipher = self.cipher_for(user_id)?;
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let ciphertext = cipher.encrypt(&nonce.into(), plaintext.as_bytes())
                               .map_err(|_| CredentialError::Encrypt)?;
        Ok(EncryptedValue { ciphertext: hex::encode(ciphertext),
                            nonce: hex::encode(nonce) })
    }

    pub fn decrypt(&self, value: &EncryptedValue, user_id: &str) -> Result<String, CredentialError> {
        let raw_nonce = hex::decode(&value.nonce).map_err(|e| CredentialError::InvalidEncoding(format!("nonce: {e}")))?;
        let nonce: [u8; NONCE_LEN] = raw_nonce.try_into().map_err(|v: Vec<u8>| {
                                                    CredentialError::InvalidEncoding(format!("nonce must be {NONCE_LEN} bytes, got {}",
                                                                                             v.len()))
                                                })?;
        let ciphertext =
            hex::decode(&value.ciphertext).map_err(|e| CredentialError::InvalidEncoding(format!("ciphertext: {e}")))?;
        let cipher = self.cipher_for(user_id)?;
        let plain = cipher.decrypt(&nonce.into(), ciphertext.as_ref())
                          .map_err(|_| CredentialError::Decrypt)?;
        String::from_utf8(plain).map_err(|_| CredentialError::Decrypt)
    }
}
