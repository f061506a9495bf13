//! Movie ratings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::movies::Movie;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub rating: f32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<Box<Movie>>,
}

impl Rating {
    pub fn new(movie_id: Uuid, rating: f32, comment: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            movie_id,
            rating,
            comment,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            movie: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRating {
    #[validate(range(min = 0.0, max = 10.0, message = "rating must be between 0 and 10"))]
    pub rating: f32,
    #[serde(default)]
    pub comment: String,
    pub movie_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRating {
    #[validate(range(min = 0.0, max = 10.0, message = "rating must be between 0 and 10"))]
    pub rating: Option<f32>,
    pub comment: Option<String>,
}

impl UpdateRating {
    pub fn apply(self, rating: &mut Rating) {
        if let Some(value) = self.rating {
            rating.rating = value;
        }
        if let Some(comment) = self.comment {
            rating.comment = comment;
        }
        rating.updated_at = Utc::now();
    }
}
