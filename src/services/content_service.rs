use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::models::{Clip, ItemsPage, News, Project, RecordId};
use crate::transport::{ContentClient, Method};

/// Likeable content collections published on the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    News,
    Projects,
    Clips,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::News, ContentKind::Projects, ContentKind::Clips];

    pub fn name(&self) -> &'static str {
        match self {
            ContentKind::News => "news",
            ContentKind::Projects => "projects",
            ContentKind::Clips => "clips",
        }
    }

    pub fn list_path(&self) -> &'static str {
        match self {
            ContentKind::News => "news/v1/get",
            ContentKind::Projects => "projects/v1/get",
            ContentKind::Clips => "clips/v1/get",
        }
    }

    pub fn item_path(&self, id: &RecordId) -> String {
        match self {
            ContentKind::News => format!("news/v1/news/by/id/{}", id),
            ContentKind::Projects => format!("projects/v1/project/by/id/{}", id),
            ContentKind::Clips => format!("clips/v1/get/by/id/{}", id),
        }
    }

    pub fn like_path(&self) -> &'static str {
        match self {
            ContentKind::News => "news/v1/like",
            ContentKind::Projects => "projects/v1/like",
            ContentKind::Clips => "clips/v1/like",
        }
    }

    pub fn unlike_path(&self) -> &'static str {
        match self {
            ContentKind::News => "news/v1/unlike",
            ContentKind::Projects => "projects/v1/unlike",
            ContentKind::Clips => "clips/v1/delete/like",
        }
    }

    /// Body key naming the liked item
    pub fn id_field(&self) -> &'static str {
        match self {
            ContentKind::News => "newsId",
            ContentKind::Projects => "projectId",
            ContentKind::Clips => "clipId",
        }
    }

    fn like_body(&self, id: &RecordId) -> Result<Value, GatewayError> {
        let mut body = Map::new();
        body.insert(self.id_field().to_string(), serde_json::to_value(id)?);
        Ok(Value::Object(body))
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(ContentKind::News),
            "projects" | "project" => Ok(ContentKind::Projects),
            "clips" | "clip" => Ok(ContentKind::Clips),
            other => Err(GatewayError::UnknownResource(other.to_string())),
        }
    }
}

/// A record type served by one content collection
pub trait ContentItem: DeserializeOwned + Serialize + Send + 'static {
    const KIND: ContentKind;
}

impl ContentItem for News {
    const KIND: ContentKind = ContentKind::News;
}

impl ContentItem for Project {
    const KIND: ContentKind = ContentKind::Projects;
}

impl ContentItem for Clip {
    const KIND: ContentKind = ContentKind::Clips;
}

pub struct ContentService {
    client: Arc<ContentClient>,
}

impl ContentService {
    pub fn new(client: Arc<ContentClient>) -> Self {
        Self { client }
    }

    pub async fn list<T: ContentItem>(&self) -> Result<Vec<T>, GatewayError> {
        let page: ItemsPage<T> = self.client.authorized(Method::GET, T::KIND.list_path(), None).await?;
        Ok(page.items)
    }

    pub async fn get<T: ContentItem>(&self, id: &RecordId) -> Result<T, GatewayError> {
        self.client.authorized(Method::GET, &T::KIND.item_path(id), None).await
    }

    pub async fn like(&self, kind: ContentKind, id: &RecordId) -> Result<Value, GatewayError> {
        let body = kind.like_body(id)?;
        tracing::debug!("Liking {} {}", kind, id);
        self.client.authorized(Method::POST, kind.like_path(), Some(&body)).await
    }

    pub async fn unlike(&self, kind: ContentKind, id: &RecordId) -> Result<Value, GatewayError> {
        let body = kind.like_body(id)?;
        tracing::debug!("Unliking {} {}", kind, id);
        self.client.authorized(Method::DELETE, kind.unlike_path(), Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse_and_display() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.name().parse::<ContentKind>().unwrap(), kind);
        }
        assert_eq!("project".parse::<ContentKind>().unwrap(), ContentKind::Projects);
        assert!(matches!("videos".parse::<ContentKind>(), Err(GatewayError::UnknownResource(_))));
    }

    #[test]
    fn test_endpoint_table() {
        let id = RecordId::Int(12);
        assert_eq!(ContentKind::News.item_path(&id), "news/v1/news/by/id/12");
        assert_eq!(ContentKind::Projects.item_path(&id), "projects/v1/project/by/id/12");
        assert_eq!(ContentKind::Clips.item_path(&id), "clips/v1/get/by/id/12");
        assert_eq!(ContentKind::Clips.unlike_path(), "clips/v1/delete/like");
    }

    #[test]
    fn test_like_body_uses_kind_id_field() {
        assert_eq!(ContentKind::News.like_body(&RecordId::Int(3)).unwrap(), json!({"newsId": 3}));
        assert_eq!(ContentKind::Projects.like_body(&RecordId::Int(4)).unwrap(), json!({"projectId": 4}));
        assert_eq!(ContentKind::Clips.like_body(&RecordId::from("c9")).unwrap(), json!({"clipId": "c9"}));
    }
}
