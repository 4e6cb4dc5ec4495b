//! Genre form. Names are unique: creating an existing name resolves to
//! the stored genre.

use async_trait::async_trait;
use uuid::Uuid;

use super::{escape, EntityForm, FormContext, FormData};
use crate::{
    error::AppResult,
    models::{Genre, GenreForm},
    repository::CatalogStore,
};

#[async_trait]
impl EntityForm for GenreForm {
    type Record = Genre;

    const FIELDS: &'static [&'static str] = &["name"];

    fn from_form(form: &FormData) -> Self {
        Self {
            name: form.text("name"),
        }
    }

    fn sanitize(self) -> Self {
        Self {
            name: escape(&self.name),
        }
    }

    fn build(&self, id: Uuid, _ctx: &FormContext) -> Genre {
        Genre {
            id,
            name: self.name.clone(),
        }
    }

    async fn find_duplicate(
        record: &Genre,
        store: &dyn CatalogStore,
    ) -> AppResult<Option<Genre>> {
        store.find_genre_by_name(&record.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use crate::services::forms::{submit, FormOutcome, RawForm};

    async fn create(store: &MemoryStore, name: &str) -> FormOutcome {
        submit::<GenreForm>(store, &FormContext::create(), RawForm::new().with("name", name))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_creating_same_name_twice_keeps_one_record() {
        let store = MemoryStore::new();

        let first = match create(&store, "Fantasy").await {
            FormOutcome::Redirect(to) => to,
            other => panic!("unexpected outcome {:?}", other),
        };
        let second = match create(&store, " Fantasy ").await {
            FormOutcome::Redirect(to) => to,
            other => panic!("unexpected outcome {:?}", other),
        };

        assert_eq!(first, second);
        let genres = store.list_genres().await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(first, genres[0].url());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let store = MemoryStore::new();

        match create(&store, "   ").await {
            FormOutcome::Invalid { errors, view } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[0].message, "Genre name required");
                assert_eq!(view.title(), Some("Create Genre"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(store.count_genres().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_name_is_stored_escaped() {
        let store = MemoryStore::new();
        create(&store, "Sci-Fi & Fantasy").await;

        let genres = store.list_genres().await.unwrap();
        assert_eq!(genres[0].name, "Sci-Fi &amp; Fantasy");
    }
}
