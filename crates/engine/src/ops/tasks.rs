//! Task mutation handlers.
//!
//! A task may be attached to one of its booking's deliverables; the
//! reference is validated to stay inside the same booking and organization.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, EntityReceipt, NewTaskCmd, UpdateTaskCmd, assignments::TaskAssignments, tasks,
    util::parse_uuid,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create a task on an existing booking.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, booking_id = %cmd.booking_id))]
    pub async fn new_task(&self, cmd: NewTaskCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let title = normalize_required_name(&cmd.title, "task")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, cmd.booking_id)
                .await?;

            let deliverable_id = match cmd.deliverable_id {
                Some(id) => Some(
                    self.require_deliverable_of_booking(
                        &db_tx,
                        &cmd.organization_id,
                        &booking.id,
                        id,
                    )
                    .await?,
                ),
                None => None,
            };

            let task_id = Uuid::new_v4();
            let row = tasks::ActiveModel {
                id: ActiveValue::Set(task_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                deliverable_id: ActiveValue::Set(deliverable_id),
                title: ActiveValue::Set(title),
                due_on: ActiveValue::Set(cmd.due_on),
                completed: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
            };
            row.insert(&db_tx).await?;

            let assignment_ids = self
                .apply_crew_and_touch::<TaskAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    task_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: task_id,
                booking_id: cmd.booking_id,
                assignment_ids,
            })
        })
    }

    /// Update a task's fields and reconcile its crew to the target set.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, task_id = %cmd.task_id))]
    pub async fn update_task(&self, cmd: UpdateTaskCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let new_title = cmd
            .title
            .as_deref()
            .map(|value| normalize_required_name(value, "task"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let model = self
                .require_task(&db_tx, &cmd.organization_id, cmd.task_id)
                .await?;
            let booking_id = parse_uuid(&model.booking_id, "booking")?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, booking_id)
                .await?;

            let mut active = tasks::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };
            let mut changed = false;
            if let Some(title) = new_title {
                active.title = ActiveValue::Set(title);
                changed = true;
            }
            if let Some(deliverable_id) = cmd.deliverable_id {
                let id = self
                    .require_deliverable_of_booking(
                        &db_tx,
                        &cmd.organization_id,
                        &booking.id,
                        deliverable_id,
                    )
                    .await?;
                active.deliverable_id = ActiveValue::Set(Some(id));
                changed = true;
            }
            if let Some(date) = cmd.due_on {
                active.due_on = ActiveValue::Set(Some(date));
                changed = true;
            }
            if let Some(completed) = cmd.completed {
                active.completed = ActiveValue::Set(completed);
                changed = true;
            }
            // a crew-only update carries no column changes
            if changed {
                active.update(&db_tx).await?;
            }

            let assignment_ids = self
                .apply_crew_and_touch::<TaskAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    cmd.task_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: cmd.task_id,
                booking_id,
                assignment_ids,
            })
        })
    }

    /// Resolve a deliverable reference and require it to belong to the same
    /// booking (and tenant) as the task being written.
    async fn require_deliverable_of_booking(
        &self,
        db_tx: &DatabaseTransaction,
        organization_id: &str,
        booking_id: &str,
        deliverable_id: Uuid,
    ) -> crate::ResultEngine<String> {
        let deliverable = self
            .require_deliverable(db_tx, organization_id, deliverable_id)
            .await?;
        if deliverable.booking_id != booking_id {
            return Err(EngineError::NotFound("deliverable".to_string()));
        }
        Ok(deliverable.id)
    }
}
