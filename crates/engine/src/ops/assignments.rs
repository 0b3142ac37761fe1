//! Assignment reconciliation engine.
//!
//! One diff-and-apply algorithm keeps a crew↔entity join table in step with
//! the caller's declared target set, shared by all four assignable kinds via
//! [`AssignmentTable`]. A delete-all/insert-all approach would churn
//! `assigned_at`/`is_lead` on members that did not change; the diff touches
//! only the rows that actually differ, which also makes the operation
//! idempotent.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use crate::{ResultEngine, assignments::AssignmentTable};

use super::Engine;

impl Engine {
    /// Makes the persisted assignment rows for `entity_id` equal exactly
    /// `target_crew`.
    ///
    /// Preconditions: every target id must be a crew member of
    /// `organization_id`, otherwise `InvalidCrewReferences` and nothing is
    /// applied. Duplicate target ids collapse to one row.
    ///
    /// Returns the ids of the newly inserted rows; rows for unchanged
    /// members are left untouched.
    pub(super) async fn reconcile_assignments<T: AssignmentTable>(
        &self,
        db_tx: &DatabaseTransaction,
        organization_id: &str,
        entity_id: Uuid,
        target_crew: &[Uuid],
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Uuid>> {
        self.require_crew_refs(db_tx, organization_id, target_crew)
            .await?;

        let target: BTreeSet<Uuid> = target_crew.iter().copied().collect();
        let existing: BTreeSet<Uuid> = T::crew_ids(db_tx, entity_id).await?.into_iter().collect();

        let to_delete: Vec<Uuid> = existing.difference(&target).copied().collect();
        T::remove(db_tx, entity_id, &to_delete).await?;

        let mut inserted = Vec::with_capacity(target.len());
        for crew_id in target.difference(&existing) {
            let id = T::insert(db_tx, organization_id, entity_id, *crew_id, now).await?;
            inserted.push(id);
        }

        tracing::debug!(
            kind = T::KIND,
            entity_id = %entity_id,
            deleted = to_delete.len(),
            added = inserted.len(),
            "reconciled crew assignments"
        );

        Ok(inserted)
    }

    /// Shared tail of every assignable-entity write: reconcile the crew set,
    /// then stamp the parent booking's `updated_at`.
    pub(super) async fn apply_crew_and_touch<T: AssignmentTable>(
        &self,
        db_tx: &DatabaseTransaction,
        organization_id: &str,
        booking_id: &str,
        entity_id: Uuid,
        target_crew: &[Uuid],
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Uuid>> {
        let inserted = self
            .reconcile_assignments::<T>(db_tx, organization_id, entity_id, target_crew, now)
            .await?;
        self.touch_booking(db_tx, booking_id, now).await?;
        Ok(inserted)
    }
}
