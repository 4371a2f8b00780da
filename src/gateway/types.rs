use serde::{Deserialize, Serialize};

use crate::models::{Created, RecordId};

/// One page of records plus the total the backend reported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<R> {
    pub data: Vec<R>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult<R> {
    pub data: R,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManyResult<R> {
    pub data: Vec<R>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateResult<D> {
    pub data: Created<D>,
}

/// Ids echoed back by a fan-out operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsResult {
    pub data: Vec<RecordId>,
}
