//! Response envelopes shared by every content endpoint.

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// `{"data": ...}` for single-entity responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Single<T> {
    pub data: T,
}

impl<T> Single<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{"data": [...], "meta": {"pagination": ...}}` for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMeta {
    pub pagination: Pagination,
}

impl<T> Listing<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            data,
            meta: ListMeta { pagination },
        }
    }
}

/// `{"error": ..., "details": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
