//! Concurrent read of a record together with related collections.
//!
//! All queries of one call are issued at once and joined before anything is
//! returned. The first failing query fails the whole call; partial results
//! are never handed out.

use futures::future::try_join_all;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    repository::{CatalogStore, DependentQuery, Record, Related},
};

/// Related query results keyed by the name they were requested under,
/// in request order
pub type RelatedSet = IndexMap<&'static str, Related>;

/// A primary record and its related collections
#[derive(Debug)]
pub struct Aggregate<P> {
    pub primary: P,
    pub related: RelatedSet,
}

/// Run every named query concurrently
pub async fn fetch_related(
    store: &dyn CatalogStore,
    queries: &[(&'static str, DependentQuery)],
) -> AppResult<RelatedSet> {
    let results = try_join_all(queries.iter().map(|&(name, query)| async move {
        query.run(store).await.map(|related| (name, related))
    }))
    .await?;

    Ok(results.into_iter().collect())
}

/// Look up `id` and run `queries` concurrently.
///
/// A missing primary record is `NotFound`, whatever the queries returned.
pub async fn fetch<P: Record>(
    store: &dyn CatalogStore,
    id: Uuid,
    queries: &[(&'static str, DependentQuery)],
) -> AppResult<Aggregate<P>> {
    let (primary, related) = tokio::try_join!(P::find(store, id), fetch_related(store, queries))?;
    let primary = primary.ok_or_else(|| AppError::not_found(P::KIND, id))?;

    Ok(Aggregate { primary, related })
}
