use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token OAuth de un servicio externo. Se guarda serializado como una
/// credencial más bajo la clave `oauth_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl OAuthToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(),
               refresh_token: None,
               expiry_date: None }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|exp| exp <= now)
    }
}
