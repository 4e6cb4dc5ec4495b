//! Block-on-reference deletion.
//!
//! A record is only removed once nothing references it. Dependents are never
//! deleted or reassigned here; the caller gets them back instead.

use uuid::Uuid;

use super::aggregate::{self, RelatedSet};
use crate::{
    error::AppResult,
    repository::{CatalogStore, DependentQuery, Record, Related},
};

/// Result of a delete attempt
#[derive(Debug)]
pub enum DeleteOutcome<P> {
    Deleted,
    /// Nothing was removed; these records still reference the entity
    Blocked { entity: P, dependents: RelatedSet },
}

/// Delete `id` unless one of the record type's dependent collections is non-empty
pub async fn attempt_delete<P: Record>(
    store: &dyn CatalogStore,
    id: Uuid,
) -> AppResult<DeleteOutcome<P>> {
    attempt_delete_with(store, id, &P::dependents(id)).await
}

/// Delete `id` unless one of `dependents` returns records.
///
/// A missing record is `NotFound`. A record that disappears between the
/// check and the delete counts as deleted.
pub async fn attempt_delete_with<P: Record>(
    store: &dyn CatalogStore,
    id: Uuid,
    dependents: &[(&'static str, DependentQuery)],
) -> AppResult<DeleteOutcome<P>> {
    let aggregate = aggregate::fetch::<P>(store, id, dependents).await?;

    let blocking: usize = aggregate.related.values().map(Related::len).sum();
    if blocking > 0 {
        tracing::info!(
            "Delete refused: {} {} is referenced by {} record(s)",
            P::KIND,
            id,
            blocking
        );
        return Ok(DeleteOutcome::Blocked {
            entity: aggregate.primary,
            dependents: aggregate.related,
        });
    }

    if P::remove(store, id).await? {
        tracing::info!("Deleted {} {}", P::KIND, id);
    } else {
        tracing::debug!("{} {} was already removed", P::KIND, id);
    }

    Ok(DeleteOutcome::Deleted)
}
