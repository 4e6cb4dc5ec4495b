//! Author form

use async_trait::async_trait;
use uuid::Uuid;

use super::{escape, EntityForm, FieldError, FormContext, FormData};
use crate::models::{parse_form_date, Author, AuthorForm};

const NAME_MAX_LEN: usize = 100;

fn name_errors(field: &str, label: &str, value: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if value.chars().count() > NAME_MAX_LEN {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters.", label, NAME_MAX_LEN),
        ));
    }
    if !value.chars().all(char::is_alphanumeric) {
        errors.push(FieldError::new(
            field,
            format!("{} has non-alphanumeric characters.", label),
        ));
    }
    errors
}

fn date_error(field: &str, message: &str, value: &str) -> Option<FieldError> {
    if value.is_empty() || parse_form_date(value).is_some() {
        return None;
    }
    Some(FieldError::new(field, message))
}

#[async_trait]
impl EntityForm for AuthorForm {
    type Record = Author;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn from_form(form: &FormData) -> Self {
        Self {
            first_name: form.text("first_name"),
            family_name: form.text("family_name"),
            date_of_birth: form.text("date_of_birth"),
            date_of_death: form.text("date_of_death"),
        }
    }

    fn extra_errors(&self) -> Vec<FieldError> {
        let mut errors = name_errors("first_name", "First name", &self.first_name);
        errors.extend(name_errors("family_name", "Family name", &self.family_name));
        errors.extend(date_error(
            "date_of_birth",
            "Invalid date of birth",
            &self.date_of_birth,
        ));
        errors.extend(date_error(
            "date_of_death",
            "Invalid date of death",
            &self.date_of_death,
        ));
        errors
    }

    fn sanitize(self) -> Self {
        Self {
            first_name: escape(&self.first_name),
            family_name: escape(&self.family_name),
            date_of_birth: escape(&self.date_of_birth),
            date_of_death: escape(&self.date_of_death),
        }
    }

    fn build(&self, id: Uuid, _ctx: &FormContext) -> Author {
        Author {
            id,
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: parse_form_date(&self.date_of_birth),
            date_of_death: parse_form_date(&self.date_of_death),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{CatalogStore, MemoryStore};
    use crate::services::forms::{submit, validate_form, FormOutcome, RawForm};
    use chrono::NaiveDate;

    fn form(first: &str, family: &str, born: &str, died: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: born.to_string(),
            date_of_death: died.to_string(),
        }
    }

    #[test]
    fn test_every_violation_is_reported_in_field_order() {
        let errors = validate_form(&form("", "O'Brien", "yesterday", "1999-02-30"));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["first_name", "family_name", "date_of_birth", "date_of_death"]
        );
        assert_eq!(errors[0].message, "First name must be specified.");
        assert_eq!(errors[1].message, "Family name has non-alphanumeric characters.");
    }

    #[test]
    fn test_valid_author_has_no_errors() {
        assert!(validate_form(&form("Jane", "Austen", "1775-12-16", "")).is_empty());
    }

    #[tokio::test]
    async fn test_create_stores_parsed_dates() {
        let store = MemoryStore::new();
        let raw = RawForm::new()
            .with("first_name", "Jane")
            .with("family_name", "Austen")
            .with("date_of_birth", "1775-12-16")
            .with("date_of_death", "1817-07-18");

        let outcome = submit::<AuthorForm>(&store, &FormContext::create(), raw)
            .await
            .unwrap();
        assert!(matches!(outcome, FormOutcome::Redirect(_)));

        let authors = store.list_authors().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].date_of_birth, NaiveDate::from_ymd_opt(1775, 12, 16));
        assert_eq!(authors[0].lifespan(), "December 16th, 1775 - July 18th, 1817");
    }
}
