//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{format_form_date, format_long_date, EntityKind};

/// Author record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// "<birth> - <death>", each side blank when unknown
    pub fn lifespan(&self) -> String {
        let birth = self.date_of_birth.map(format_long_date).unwrap_or_default();
        let death = self.date_of_death.map(format_long_date).unwrap_or_default();
        format!("{} - {}", birth, death)
    }

    pub fn url(&self) -> String {
        EntityKind::Author.record_path(self.id)
    }
}

/// Author as rendered, with derived values
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub date_of_birth_form: String,
    pub date_of_death_form: String,
    pub url: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            date_of_birth_form: format_form_date(author.date_of_birth),
            date_of_death_form: format_form_date(author.date_of_death),
            url: author.url(),
            author,
        }
    }
}

/// Author form submission (trimmed values)
#[derive(Debug, Clone, Default, Validate)]
pub struct AuthorForm {
    #[validate(length(min = 1, message = "First name must be specified."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Family name must be specified."))]
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}
