use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attachment::AttachmentRef;
use super::RecordId;

/// `{ items, count }` page returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    // Sent as text by some deployments and as a number by others
    #[serde(default)]
    pub reminder: Option<Value>,
    #[serde(default)]
    pub avatar_attachment_id: Option<RecordId>,
    #[serde(default)]
    pub avatar_attachment: Option<AttachmentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Option<i64>,
    #[serde(default)]
    pub lessons: Option<i64>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub avatar_attachment_id: Option<RecordId>,
    #[serde(default)]
    pub avatar_attachment: Option<AttachmentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub clip_attachment_id: Option<RecordId>,
    #[serde(default)]
    pub clip_attachment: Option<AttachmentRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_news_page_decodes() {
        let page: ItemsPage<News> = serde_json::from_value(json!({
            "items": [
                {"id": 1, "name": "Open day", "likes": 3, "reminder": 2},
                {"id": 2, "name": "Olympiad", "likes": null, "reminder": "soon",
                 "avatarAttachment": {"id": "a1", "name": "p.jpg", "path": "/p.jpg", "uri": "http://cdn/p.jpg"}}
            ],
            "count": 2
        }))
        .unwrap();

        assert_eq!(page.count, Some(2));
        assert_eq!(page.items[0].likes, Some(3));
        assert_eq!(page.items[1].likes, None);
        assert!(page.items[1].avatar_attachment.is_some());
    }

    #[test]
    fn test_page_without_count() {
        let page: ItemsPage<Clip> = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, None);
    }
}
