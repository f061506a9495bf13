//! Genre records and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::movies::Movie;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Filled on the detail view only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<Movie>,
}

impl Genre {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            movies: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGenre {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
}

impl UpdateGenre {
    pub fn apply(self, genre: &mut Genre) {
        if let Some(name) = self.name {
            genre.name = name;
        }
        genre.updated_at = Utc::now();
    }
}
