use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::RecordId;

/// 1-based page request as issued by list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Zero-based offset of the first record on this page; `None` on overflow
    pub fn skip(&self) -> Option<u64> {
        self.page.checked_sub(1)?.checked_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Exclusive end offset, used by the `_start`/`_end` convention
    pub fn end(&self) -> Option<u64> {
        self.page.checked_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_upper(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, order: SortDirection) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new("id", SortDirection::Asc)
    }
}

/// Parameters of a paginated, sorted, filtered list request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    pub pagination: Pagination,
    pub sort: Sort,
    #[serde(default)]
    pub filter: Map<String, Value>,
}

/// List parameters restricted to records referencing `id` through `target`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: RecordId,
    pub pagination: Pagination,
    pub sort: Sort,
    #[serde(default)]
    pub filter: Map<String, Value>,
}

/// Ordered query-string pairs; repeated keys carry list values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, keeping any earlier pair with the same key
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Give `key` a single value.
    ///
    /// The first existing occurrence keeps its position and takes the new
    /// value, later duplicates are dropped. A new key goes to the end.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key=value&key2=value2`, form-urlencoded
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}
