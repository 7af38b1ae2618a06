//! `CredentialVault`: credenciales cifradas indexadas por
//! (usuario, servicio, clave).
//!
//! Los valores nunca se guardan en claro y nunca se escriben en el log.
//! El mapa es concurrente (`DashMap`), así que el vault se comparte entre
//! tareas detrás de un `Arc` sin locks adicionales.
use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use log::{info, warn};

use crate::crypto::{EncryptedValue, UserCipher};
use crate::error::CredentialError;
use crate::policy::{AllowAll, SharePolicy, ShareRequest};
use crate::token::OAuthToken;

/// Clave bajo la que se guarda el token OAuth de un servicio.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Slot {
    user_id: String,
    service: String,
    key: String,
}

impl Slot {
    fn new(user_id: &str, service: &str, key: &str) -> Self {
        Self { user_id: user_id.to_string(),
               service: service.to_string(),
               key: key.to_string() }
    }
}

pub struct CredentialVault {
    cipher: UserCipher,
    entries: DashMap<Slot, EncryptedValue>,
    policy: Arc<dyn SharePolicy>,
}

impl CredentialVault {
    pub fn new(master_secret: impl AsRef<[u8]>) -> Self {
        Self { cipher: UserCipher::new(master_secret),
               entries: DashMap::new(),
               policy: Arc::new(AllowAll) }
    }

    /// Reemplaza la política usada por `share_credential`.
    pub fn with_policy(mut self, policy: Arc<dyn SharePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn encrypt(&self, plaintext: &str, user_id: &str) -> Result<EncryptedValue, CredentialError> {
        self.cipher.encrypt(plaintext, user_id)
    }

    pub fn decrypt(&self, value: &EncryptedValue, user_id: &str) -> Result<String, CredentialError> {
        self.cipher.decrypt(value, user_id)
    }

    /// Cifra y guarda un valor; sobrescribe si ya existía.
    pub fn store_credential(&self,
                            user_id: &str,
                            service: &str,
                            key: &str,
                            value: &str)
                            -> Result<(), CredentialError> {
        require("user_id", user_id)?;
        require("service", service)?;
        require("key", key)?;
        require("value", value)?;

        let encrypted = self.cipher.encrypt(value, user_id)?;
        self.entries.insert(Slot::new(user_id, service, key), encrypted);
        info!("credential stored user={user_id} service={service} key={key}");
        Ok(())
    }

    pub fn get_credential(&self, user_id: &str, service: &str, key: &str) -> Result<Option<String>, CredentialError> {
        // clonar el valor antes de descifrar para no retener el shard
        let stored = self.entries.get(&Slot::new(user_id, service, key)).map(|e| e.value().clone());
        stored.map(|v| self.cipher.decrypt(&v, user_id)).transpose()
    }

    /// Con `Some(service)` lista las claves de ese servicio; con `None`, los
    /// servicios del usuario. Orden alfabético.
    pub fn list_credentials(&self, user_id: &str, service: Option<&str>) -> Vec<String> {
        let names: BTreeSet<String> = self.entries
                                          .iter()
                                          .filter(|e| e.key().user_id == user_id)
                                          .filter_map(|e| match service {
                                              Some(s) if e.key().service == s => Some(e.key().key.clone()),
                                              Some(_) => None,
                                              None => Some(e.key().service.clone()),
                                          })
                                          .collect();
        names.into_iter().collect()
    }

    /// `true` si existía y se eliminó.
    pub fn remove_credential(&self, user_id: &str, service: &str, key: &str) -> bool {
        let removed = self.entries.remove(&Slot::new(user_id, service, key)).is_some();
        if removed {
            info!("credential removed user={user_id} service={service} key={key}");
        }
        removed
    }

    pub fn store_oauth_token(&self, user_id: &str, service: &str, token: &OAuthToken) -> Result<(), CredentialError> {
        require("access_token", &token.access_token)?;
        let raw = serde_json::to_string(token).map_err(|e| CredentialError::Serialization(e.to_string()))?;
        self.store_credential(user_id, service, OAUTH_TOKEN_KEY, &raw)
    }

    pub fn get_oauth_token(&self, user_id: &str, service: &str) -> Result<Option<OAuthToken>, CredentialError> {
        match self.get_credential(user_id, service, OAUTH_TOKEN_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map(Some)
                                                   .map_err(|e| CredentialError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Validación local: más de 10 caracteres y sin la marca `invalid`.
    pub fn validate_credential(&self, _service: &str, value: &str) -> bool {
        value.chars().count() > 10 && !value.contains("invalid")
    }

    /// Valida el nuevo valor y lo guarda. `Ok(false)` si la validación lo
    /// rechaza; el valor anterior queda intacto.
    pub fn rotate_credential(&self,
                             user_id: &str,
                             service: &str,
                             key: &str,
                             new_value: &str)
                             -> Result<bool, CredentialError> {
        if !self.validate_credential(service, new_value) {
            warn!("credential rotation rejected user={user_id} service={service} key={key}");
            return Ok(false);
        }
        self.store_credential(user_id, service, key, new_value)?;
        info!("credential rotated user={user_id} service={service} key={key}");
        Ok(true)
    }

    /// Entrega una credencial a un agente si la política lo autoriza.
    /// `Ok(None)` cuando no está autorizado o la credencial no existe.
    pub fn share_credential(&self,
                            user_id: &str,
                            agent_id: &str,
                            service: &str,
                            key: &str)
                            -> Result<Option<String>, CredentialError> {
        let request = ShareRequest { user_id,
                                     agent_id,
                                     service,
                                     key };
        if !self.policy.allows(&request) {
            warn!("credential share denied agent={agent_id} user={user_id} service={service} key={key}");
            return Ok(None);
        }
        let value = self.get_credential(user_id, service, key)?;
        match &value {
            Some(_) => info!("credential shared agent={agent_id} user={user_id} service={service} key={key}"),
            None => warn!("credential not found for share agent={agent_id} user={user_id} service={service} key={key}"),
        }
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CredentialError> {
    if value.trim().is_empty() {
        Err(CredentialError::MissingField(field))
    } else {
        Ok(())
    }
}
