use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{RecordId, ResourceRecord};
use crate::error::GatewayError;
use crate::resource::Resource;
use crate::transport::{FilePart, RequestBody};

/// Multipart field the storage endpoint reads the upload from
pub const ATTACHMENT_FIELD: &str = "attachment";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Attachment embedded in other records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRef {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Upload form: `{ attachments: { rawFile } }`
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentUpload {
    pub attachments: FileInput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInput {
    pub raw_file: RawFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// File picked for upload. Only its metadata is ever serialized.
#[derive(Debug, Clone, Serialize)]
pub struct RawFile {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn from_path(path: &Path) -> Result<Self, GatewayError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GatewayError::InvalidRequest(format!("Not a file path: {}", path.display())))?;
        Ok(Self::new(name, bytes))
    }
}

impl AttachmentUpload {
    pub fn new(raw_file: RawFile) -> Self {
        Self {
            attachments: FileInput { raw_file, title: None },
        }
    }
}

impl ResourceRecord for Attachment {
    const RESOURCE: Resource = Resource::Attachments;
    type Draft = AttachmentUpload;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create_body(draft: &AttachmentUpload) -> Result<RequestBody, GatewayError> {
        let file = &draft.attachments.raw_file;
        Ok(RequestBody::Multipart(vec![FilePart {
            field: ATTACHMENT_FIELD.to_string(),
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            bytes: file.bytes.clone(),
        }]))
    }
}
