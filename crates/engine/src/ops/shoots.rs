//! Shoot mutation handlers.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EntityReceipt, NewShootCmd, UpdateShootCmd, assignments::ShootAssignments, shoots,
    util::parse_uuid,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a shoot on an existing booking.
    ///
    /// The crew list goes through the reconciliation engine with an empty
    /// existing set (pure insert case); the parent booking is stamped.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, booking_id = %cmd.booking_id))]
    pub async fn new_shoot(&self, cmd: NewShootCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let title = normalize_required_name(&cmd.title, "shoot")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, cmd.booking_id)
                .await?;

            let shoot_id = Uuid::new_v4();
            let row = shoots::ActiveModel {
                id: ActiveValue::Set(shoot_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                title: ActiveValue::Set(title),
                location: ActiveValue::Set(normalize_optional_text(cmd.location.as_deref())),
                scheduled_on: ActiveValue::Set(cmd.scheduled_on),
                created_at: ActiveValue::Set(now),
            };
            row.insert(&db_tx).await?;

            let assignment_ids = self
                .apply_crew_and_touch::<ShootAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    shoot_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: shoot_id,
                booking_id: cmd.booking_id,
                assignment_ids,
            })
        })
    }

    /// Update a shoot's fields and reconcile its crew to the target set.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, shoot_id = %cmd.shoot_id))]
    pub async fn update_shoot(&self, cmd: UpdateShootCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let new_title = cmd
            .title
            .as_deref()
            .map(|value| normalize_required_name(value, "shoot"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let model = self
                .require_shoot(&db_tx, &cmd.organization_id, cmd.shoot_id)
                .await?;
            let booking_id = parse_uuid(&model.booking_id, "booking")?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, booking_id)
                .await?;

            let mut active = shoots::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };
            let mut changed = false;
            if let Some(title) = new_title {
                active.title = ActiveValue::Set(title);
                changed = true;
            }
            if let Some(location) = cmd.location.as_deref() {
                active.location = ActiveValue::Set(normalize_optional_text(Some(location)));
                changed = true;
            }
            if let Some(date) = cmd.scheduled_on {
                active.scheduled_on = ActiveValue::Set(Some(date));
                changed = true;
            }
            // a crew-only update carries no column changes
            if changed {
                active.update(&db_tx).await?;
            }

            let assignment_ids = self
                .apply_crew_and_touch::<ShootAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    cmd.shoot_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: cmd.shoot_id,
                booking_id,
                assignment_ids,
            })
        })
    }
}
