pub mod attachment;
pub mod auth;
pub mod content;
pub mod user;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::resource::Resource;
use crate::transport::RequestBody;

pub use attachment::{Attachment, AttachmentRef, AttachmentUpload, FileInput, RawFile};
pub use auth::{
    AuthForm, AuthResponse, EmailVerificationConfirm, EmailVerificationRequest, Identity,
    LoginCredentials, Profile, ProfileUpdate, RegistrationForm,
};
pub use content::{Clip, ItemsPage, News, Project};
pub use user::{Permission, User, UserDraft, UserPatch};

/// Record identifier; integer or string depending on the backend collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// A record type served by one gateway resource
pub trait ResourceRecord: DeserializeOwned + Serialize + Send + Sync + 'static {
    const RESOURCE: Resource;

    /// Payload accepted when creating a record
    type Draft: Serialize + Send + Sync;

    fn id(&self) -> &RecordId;

    /// Request body for a create call; JSON unless the resource needs otherwise
    fn create_body(draft: &Self::Draft) -> Result<RequestBody, GatewayError> {
        RequestBody::json(draft)
    }
}

/// Outcome of a create call: the submitted payload plus the id the server assigned
#[derive(Debug, Clone, Serialize)]
pub struct Created<D> {
    #[serde(flatten)]
    pub data: D,
    pub id: RecordId,
}
