//! Create/update form handling shared by every record type.
//!
//! A submission goes through four stages, in order:
//! normalize (every field becomes a sequence), validate (collect every
//! violation), sanitize (HTML-escape what will be stored or echoed), then
//! either persist and redirect, or redisplay the form with its errors.

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::{
    aggregate::{self, RelatedSet},
    view::ViewBag,
};
use crate::{
    error::{AppError, AppResult},
    models::EntityKind,
    repository::{CatalogStore, DependentQuery, Record},
};

/// A submitted field as it arrives: one value or several
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    One(String),
    Many(Vec<String>),
}

/// Submitted fields, in submission order. A missing field is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm(IndexMap<String, FieldInput>);

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs as decoded from a urlencoded body.
    /// A name seen more than once becomes a multi-valued field.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |form, (name, value)| form.with(&name, &value))
    }

    /// Append one value to a field
    pub fn with(mut self, name: &str, value: &str) -> Self {
        match self.0.get_mut(name) {
            None => {
                self.0
                    .insert(name.to_string(), FieldInput::One(value.to_string()));
            }
            Some(input) => {
                let mut values = match std::mem::replace(input, FieldInput::Many(Vec::new())) {
                    FieldInput::One(first) => vec![first],
                    FieldInput::Many(all) => all,
                };
                values.push(value.to_string());
                *input = FieldInput::Many(values);
            }
        }
        self
    }
}

/// Fields after normalization: every field is a sequence of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(IndexMap<String, Vec<String>>);

impl FormData {
    pub fn normalize(raw: RawForm) -> Self {
        Self(
            raw.0
                .into_iter()
                .map(|(name, input)| {
                    let values = match input {
                        FieldInput::One(value) => vec![value],
                        FieldInput::Many(values) => values,
                    };
                    (name, values)
                })
                .collect(),
        )
    }

    /// First value of a field, trimmed; empty when the field is absent
    pub fn text(&self, name: &str) -> String {
        self.0
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Every non-blank value of a field, trimmed; empty when absent
    pub fn values(&self, name: &str) -> Vec<String> {
        self.0
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// HTML-escape a submitted value
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Replace the record with this id, keeping the id
    Update(Uuid),
}

/// Request state threaded through every stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormContext {
    pub mode: FormMode,
    /// Default for dates the form leaves empty
    pub today: NaiveDate,
}

impl FormContext {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            today: Utc::now().date_naive(),
        }
    }

    pub fn update(id: Uuid) -> Self {
        Self {
            mode: FormMode::Update(id),
            today: Utc::now().date_naive(),
        }
    }

    pub fn title(&self, kind: EntityKind) -> String {
        match self.mode {
            FormMode::Create => format!("Create {}", kind.label()),
            FormMode::Update(_) => format!("Update {}", kind.label()),
        }
    }
}

/// Result of a submission
#[derive(Debug)]
pub enum FormOutcome {
    /// Stored (or resolved to an existing record); go to this path
    Redirect(String),
    /// Nothing stored; redisplay the form
    Invalid { errors: Vec<FieldError>, view: ViewBag },
}

/// Per record type hooks for the pipeline
#[async_trait]
pub trait EntityForm: Validate + Sized + Send + Sync {
    type Record: Record;

    /// Field order used to report errors
    const FIELDS: &'static [&'static str];

    /// Read trimmed values out of the normalized form
    fn from_form(form: &FormData) -> Self;

    /// Rules the derived validation does not express
    fn extra_errors(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Escape every free-text value
    fn sanitize(self) -> Self;

    /// Candidate record built from (sanitized) values. Unparseable values
    /// fall back to defaults; they have already been reported as errors.
    fn build(&self, id: Uuid, ctx: &FormContext) -> Self::Record;

    /// Lists needed to draw the form's selectable options
    fn option_queries() -> Vec<(&'static str, DependentQuery)> {
        Vec::new()
    }

    fn render_options(
        view: ViewBag,
        _record: Option<&Self::Record>,
        options: &RelatedSet,
    ) -> AppResult<ViewBag> {
        view.with_related(options)
    }

    /// References in the record that do not resolve
    async fn reference_errors(
        _record: &Self::Record,
        _store: &dyn CatalogStore,
    ) -> AppResult<Vec<FieldError>> {
        Ok(Vec::new())
    }

    /// An existing record the candidate would duplicate
    async fn find_duplicate(
        _record: &Self::Record,
        _store: &dyn CatalogStore,
    ) -> AppResult<Option<Self::Record>> {
        Ok(None)
    }
}

/// Check every rule and report all violations, in field order
pub fn validate_form<F: EntityForm>(form: &F) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(e) = form.validate() {
        for (field, field_errors) in e.field_errors() {
            let field = field.to_string();
            for err in field_errors.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                errors.push(FieldError::new(&field, message));
            }
        }
    }
    errors.extend(form.extra_errors());

    errors.sort_by_key(|e| {
        F::FIELDS
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(usize::MAX)
    });
    errors
}

fn form_view<F: EntityForm>(
    ctx: &FormContext,
    record: Option<&F::Record>,
    options: &RelatedSet,
    errors: &[FieldError],
) -> AppResult<ViewBag> {
    let kind = <F::Record as Record>::KIND;
    let mut view = ViewBag::titled(ctx.title(kind));
    if let Some(record) = record {
        view = view.with_value(kind.key(), record.view()?);
    }
    view = F::render_options(view, record, options)?;
    if !errors.is_empty() {
        view = view.with("errors", errors)?;
    }
    Ok(view)
}

/// The empty create form, or the update form seeded with the stored record
pub async fn prefill<F: EntityForm>(
    store: &dyn CatalogStore,
    ctx: &FormContext,
) -> AppResult<ViewBag> {
    let queries = F::option_queries();
    match ctx.mode {
        FormMode::Create => {
            let options = aggregate::fetch_related(store, &queries).await?;
            form_view::<F>(ctx, None, &options, &[])
        }
        FormMode::Update(id) => {
            let aggregate = aggregate::fetch::<F::Record>(store, id, &queries).await?;
            form_view::<F>(ctx, Some(&aggregate.primary), &aggregate.related, &[])
        }
    }
}

/// Run a submission through the pipeline
pub async fn submit<F: EntityForm>(
    store: &dyn CatalogStore,
    ctx: &FormContext,
    raw: RawForm,
) -> AppResult<FormOutcome> {
    let kind = <F::Record as Record>::KIND;

    let data = FormData::normalize(raw);
    let form = F::from_form(&data);
    let mut errors = validate_form(&form);
    let form = form.sanitize();

    let id = match ctx.mode {
        FormMode::Create => Uuid::new_v4(),
        FormMode::Update(id) => id,
    };
    let record = form.build(id, ctx);

    if errors.is_empty() {
        errors = F::reference_errors(&record, store).await?;
    }

    if !errors.is_empty() {
        tracing::debug!("{} form rejected with {} error(s)", kind, errors.len());
        let options = aggregate::fetch_related(store, &F::option_queries()).await?;
        let view = form_view::<F>(ctx, Some(&record), &options, &errors)?;
        return Ok(FormOutcome::Invalid { errors, view });
    }

    match ctx.mode {
        FormMode::Create => {
            if let Some(existing) = F::find_duplicate(&record, store).await? {
                tracing::info!(
                    "{} already stored as {}, not creating a duplicate",
                    kind,
                    existing.id()
                );
                return Ok(FormOutcome::Redirect(existing.url()));
            }
            record.insert(store).await?;
            tracing::info!("Created {} {}", kind, id);
        }
        FormMode::Update(id) => {
            if !record.replace(store).await? {
                return Err(AppError::not_found(kind, id));
            }
            tracing::info!("Updated {} {}", kind, id);
        }
    }

    Ok(FormOutcome::Redirect(record.url()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absent_single_and_many() {
        let raw = RawForm::new()
            .with("title", "  Dune ")
            .with("genre", "a")
            .with("genre", "b")
            .with("genre", "  ");
        let form = FormData::normalize(raw);

        assert_eq!(form.text("title"), "Dune");
        assert_eq!(form.values("title"), vec!["Dune"]);
        assert_eq!(form.values("genre"), vec!["a", "b"]);
        assert!(form.values("missing").is_empty());
        assert_eq!(form.text("missing"), "");
    }

    #[test]
    fn test_from_pairs_groups_repeated_names() {
        let raw = RawForm::from_pairs(vec![
            ("genre".to_string(), "x".to_string()),
            ("title".to_string(), "T".to_string()),
            ("genre".to_string(), "y".to_string()),
        ]);
        let expected = RawForm::new().with("title", "T").with("genre", "x").with("genre", "y");
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>x</script>"),
            "&lt;script&gt;x&lt;&#x2F;script&gt;"
        );
        assert_eq!(escape(r#"Tom & "Jerry's""#), "Tom &amp; &quot;Jerry&#x27;s&quot;");
        assert_eq!(escape("plain text 123"), "plain text 123");
    }

    #[test]
    fn test_context_titles() {
        assert_eq!(FormContext::create().title(EntityKind::Book), "Create Book");
        assert_eq!(
            FormContext::update(Uuid::nil()).title(EntityKind::Genre),
            "Update Genre"
        );
    }
}
