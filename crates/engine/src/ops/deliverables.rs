//! Deliverable mutation handlers.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EntityReceipt, NewDeliverableCmd, UpdateDeliverableCmd,
    assignments::DeliverableAssignments, deliverables, util::parse_uuid,
};

use super::{Engine, normalize_required_name, parse_amount, with_tx};

impl Engine {
    /// Create a deliverable on an existing booking.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, booking_id = %cmd.booking_id))]
    pub async fn new_deliverable(
        &self,
        cmd: NewDeliverableCmd,
    ) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let title = normalize_required_name(&cmd.title, "deliverable")?;
        let cost = parse_amount(&cmd.cost, "deliverable cost")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, cmd.booking_id)
                .await?;

            let deliverable_id = Uuid::new_v4();
            let row = deliverables::ActiveModel {
                id: ActiveValue::Set(deliverable_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                title: ActiveValue::Set(title),
                package_included: ActiveValue::Set(cmd.package_included),
                cost_minor: ActiveValue::Set(cost.minor()),
                quantity: ActiveValue::Set(cmd.quantity),
                due_on: ActiveValue::Set(cmd.due_on),
                created_at: ActiveValue::Set(now),
            };
            row.insert(&db_tx).await?;

            let assignment_ids = self
                .apply_crew_and_touch::<DeliverableAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    deliverable_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: deliverable_id,
                booking_id: cmd.booking_id,
                assignment_ids,
            })
        })
    }

    /// Update a deliverable's fields and reconcile its crew to the target
    /// set.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, deliverable_id = %cmd.deliverable_id))]
    pub async fn update_deliverable(
        &self,
        cmd: UpdateDeliverableCmd,
    ) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let new_title = cmd
            .title
            .as_deref()
            .map(|value| normalize_required_name(value, "deliverable"))
            .transpose()?;
        let new_cost = cmd
            .cost
            .as_deref()
            .map(|value| parse_amount(value, "deliverable cost"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let model = self
                .require_deliverable(&db_tx, &cmd.organization_id, cmd.deliverable_id)
                .await?;
            let booking_id = parse_uuid(&model.booking_id, "booking")?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, booking_id)
                .await?;

            let mut active = deliverables::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };
            let mut changed = false;
            if let Some(title) = new_title {
                active.title = ActiveValue::Set(title);
                changed = true;
            }
            if let Some(included) = cmd.package_included {
                active.package_included = ActiveValue::Set(included);
                changed = true;
            }
            if let Some(cost) = new_cost {
                active.cost_minor = ActiveValue::Set(cost.minor());
                changed = true;
            }
            if let Some(quantity) = cmd.quantity {
                active.quantity = ActiveValue::Set(quantity);
                changed = true;
            }
            if let Some(date) = cmd.due_on {
                active.due_on = ActiveValue::Set(Some(date));
                changed = true;
            }
            // a crew-only update carries no column changes
            if changed {
                active.update(&db_tx).await?;
            }

            let assignment_ids = self
                .apply_crew_and_touch::<DeliverableAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    cmd.deliverable_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: cmd.deliverable_id,
                booking_id,
                assignment_ids,
            })
        })
    }
}
