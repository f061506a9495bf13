//! JSON response envelopes

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

pub const UPDATE_SUCCESS: &str = "Data successfully updated!";
pub const DELETE_SUCCESS: &str = "Data successfully deleted!";

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: u16,
}

/// Body of plain success messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn updated() -> Self {
        Self::new(UPDATE_SUCCESS)
    }

    pub fn deleted() -> Self {
        Self::new(DELETE_SUCCESS)
    }
}

/// A page of results with its pagination meta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub meta: Pagination,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, meta: Pagination) -> Self {
        Self { meta, data }
    }
}
