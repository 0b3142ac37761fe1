//! Tenant scope guard.
//!
//! Every lookup in the engine goes through these helpers, which predicate on
//! the caller's organization id. A row owned by another organization fails
//! with `NotFound`, exactly like a row that does not exist: existence is
//! never revealed across tenants.

use std::collections::BTreeSet;

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, bookings, crew, deliverables, expenses, organizations, shoots,
    tasks,
};

use super::Engine;

/// Generates a tenant-scoped `require_*` lookup for a booking-owned entity.
macro_rules! impl_require_in_org {
    ($require_fn:ident, $entity:path, $model:ty, $org_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            organization_id: &str,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($org_col.eq(organization_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    /// Resolves the caller's organization or fails with `Unscoped`.
    ///
    /// A blank id is rejected before any storage access; an unknown id is
    /// rejected after a single lookup. Either way no tenant-scoped work has
    /// started yet.
    pub(super) async fn require_organization(
        &self,
        db: &DatabaseTransaction,
        organization_id: &str,
    ) -> ResultEngine<()> {
        if organization_id.trim().is_empty() {
            return Err(EngineError::Unscoped(
                "missing organization id".to_string(),
            ));
        }
        let exists = organizations::Entity::find_by_id(organization_id.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::Unscoped(format!(
                "unknown organization: {organization_id}"
            )));
        }
        Ok(())
    }

    pub(super) async fn require_booking(
        &self,
        db: &DatabaseTransaction,
        organization_id: &str,
        booking_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        bookings::Entity::find_by_id(booking_id.to_string())
            .filter(bookings::Column::OrganizationId.eq(organization_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("booking".to_string()))
    }

    impl_require_in_org!(
        require_shoot,
        shoots::Entity,
        shoots::Model,
        shoots::Column::OrganizationId,
        "shoot"
    );
    impl_require_in_org!(
        require_deliverable,
        deliverables::Entity,
        deliverables::Model,
        deliverables::Column::OrganizationId,
        "deliverable"
    );
    impl_require_in_org!(
        require_task,
        tasks::Entity,
        tasks::Model,
        tasks::Column::OrganizationId,
        "task"
    );
    impl_require_in_org!(
        require_expense,
        expenses::Entity,
        expenses::Model,
        expenses::Column::OrganizationId,
        "expense"
    );

    /// Batch-validates that every id refers to a crew member of this
    /// organization.
    ///
    /// Duplicates are tolerated; on any miss the full list of offending ids
    /// is reported and nothing has been written.
    pub(super) async fn require_crew_refs(
        &self,
        db: &DatabaseTransaction,
        organization_id: &str,
        crew_ids: &[Uuid],
    ) -> ResultEngine<()> {
        if crew_ids.is_empty() {
            return Ok(());
        }
        let wanted: BTreeSet<Uuid> = crew_ids.iter().copied().collect();
        let ids: Vec<String> = wanted.iter().map(ToString::to_string).collect();

        let rows = crew::Entity::find()
            .filter(crew::Column::OrganizationId.eq(organization_id))
            .filter(crew::Column::Id.is_in(ids))
            .all(db)
            .await?;
        let found: BTreeSet<String> = rows.into_iter().map(|model| model.id).collect();

        let missing: Vec<Uuid> = wanted
            .into_iter()
            .filter(|id| !found.contains(&id.to_string()))
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::InvalidCrewReferences(missing));
        }
        Ok(())
    }
}
