//! Movie records and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::genres::Genre;
use crate::ratings::Rating;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    /// Running time in minutes
    pub duration: i32,
    pub year: i32,
    pub synopsis: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratings: Vec<Rating>,
}

impl Movie {
    pub fn new(title: String, duration: i32, year: i32, synopsis: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            duration,
            year,
            synopsis,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            genres: Vec::new(),
            ratings: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn genre_ids(&self) -> Vec<Uuid> {
        self.genres.iter().map(|g| g.id).collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration: i32,
    #[validate(range(min = 1, message = "year must be positive"))]
    pub year: i32,
    #[validate(length(min = 1, message = "synopsis is required"))]
    pub synopsis: String,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genre_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMovie {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration: Option<i32>,
    #[validate(range(min = 1, message = "year must be positive"))]
    pub year: Option<i32>,
    #[validate(length(min = 1, message = "synopsis must not be empty"))]
    pub synopsis: Option<String>,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genre_ids: Option<Vec<Uuid>>,
}

impl UpdateMovie {
    /// Apply scalar fields; `genre_ids` is resolved by the service
    pub fn apply(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(synopsis) = &self.synopsis {
            movie.synopsis = synopsis.clone();
        }
        movie.updated_at = Utc::now();
    }
}
