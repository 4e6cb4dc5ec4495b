//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::EntityKind;

/// Genre record. Names are unique by convention, checked before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        EntityKind::Genre.record_path(self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: genre.url(),
            genre,
        }
    }
}

/// Genre form submission
#[derive(Debug, Clone, Default, Validate)]
pub struct GenreForm {
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}
