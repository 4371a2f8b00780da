use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::models::{Identity, RecordId};

/// Authentication payload as returned by the backend, kept whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TokenData {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            payload: Map::new(),
        }
    }

    /// Fails when the payload carries no `accessToken`
    pub fn from_payload(payload: Value) -> Result<Self, GatewayError> {
        Ok(serde_json::from_value(payload)?)
    }

    /// Display identity: top-level `id`/`fullName`/`avatar`, falling back to
    /// the nested `user` object
    pub fn identity(&self) -> Identity {
        let user = self.payload.get("user").and_then(Value::as_object);

        let id = self
            .payload
            .get("id")
            .or_else(|| user.and_then(|u| u.get("id")))
            .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok());

        let full_name = string_field(&self.payload, "fullName").or_else(|| {
            let user = user?;
            let parts: Vec<String> = ["firstname", "lastname"]
                .iter()
                .filter_map(|key| string_field(user, key))
                .collect();
            if parts.is_empty() { None } else { Some(parts.join(" ")) }
        });

        let avatar = string_field(&self.payload, "avatar").or_else(|| {
            user?
                .get("avatarAttachment")?
                .get("uri")?
                .as_str()
                .map(str::to_string)
        });

        Identity { id, full_name, avatar }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Source of the session token, injected into transports at construction
pub trait CredentialProvider: Send + Sync {
    fn get(&self) -> Result<Option<TokenData>, GatewayError>;
    fn set(&self, token: TokenData) -> Result<(), GatewayError>;
    fn clear(&self) -> Result<(), GatewayError>;

    fn access_token(&self) -> Result<Option<String>, GatewayError> {
        Ok(self.get()?.map(|t| t.access_token))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<TokenData>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: TokenData) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

fn poisoned<T>(_: T) -> GatewayError {
    GatewayError::CredentialStore("credential lock poisoned".to_string())
}

impl CredentialProvider for MemoryCredentials {
    fn get(&self) -> Result<Option<TokenData>, GatewayError> {
        Ok(self.token.read().map_err(poisoned)?.clone())
    }

    fn set(&self, token: TokenData) -> Result<(), GatewayError> {
        *self.token.write().map_err(poisoned)? = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), GatewayError> {
        *self.token.write().map_err(poisoned)? = None;
        Ok(())
    }
}

/// On-disk form of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: TokenData,
    pub saved_at: DateTime<Utc>,
}

/// Session persisted as a JSON file; a missing file means signed out
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> Result<Option<StoredSession>, GatewayError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: StoredSession = serde_json::from_str(&content)?;
        Ok(Some(session))
    }
}

impl CredentialProvider for FileCredentials {
    fn get(&self) -> Result<Option<TokenData>, GatewayError> {
        Ok(self.session()?.map(|s| s.token))
    }

    fn set(&self, token: TokenData) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let session = StoredSession {
            token,
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), GatewayError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
