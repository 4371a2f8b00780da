use serde::{Deserialize, Serialize};

use super::attachment::AttachmentRef;
use super::{RecordId, ResourceRecord};
use crate::resource::Resource;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link_to_vk: Option<String>,
    #[serde(default)]
    pub avatar_attachment_id: Option<RecordId>,
    #[serde(default)]
    pub avatar_attachment: Option<AttachmentRef>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub field_name: String,
}

/// Admin-side user creation form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Partial update; absent fields are not sent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_attachment_id: Option<RecordId>,
}

impl ResourceRecord for User {
    const RESOURCE: Resource = Resource::Users;
    type Draft = UserDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
