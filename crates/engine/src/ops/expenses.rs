//! Expense mutation handlers.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EntityReceipt, NewExpenseCmd, UpdateExpenseCmd, assignments::ExpenseAssignments, expenses,
    util::parse_uuid,
};

use super::{Engine, normalize_required_name, parse_positive_amount, with_tx};

impl Engine {
    /// Create an expense on an existing booking.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, booking_id = %cmd.booking_id))]
    pub async fn new_expense(&self, cmd: NewExpenseCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let description = normalize_required_name(&cmd.description, "expense")?;
        let amount = parse_positive_amount(&cmd.amount, "expense amount")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, cmd.booking_id)
                .await?;

            let expense_id = Uuid::new_v4();
            let row = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(cmd.organization_id.clone()),
                description: ActiveValue::Set(description),
                amount_minor: ActiveValue::Set(amount.minor()),
                spent_on: ActiveValue::Set(cmd.spent_on),
                created_at: ActiveValue::Set(now),
            };
            row.insert(&db_tx).await?;

            let assignment_ids = self
                .apply_crew_and_touch::<ExpenseAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    expense_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: expense_id,
                booking_id: cmd.booking_id,
                assignment_ids,
            })
        })
    }

    /// Update an expense's fields and reconcile its crew to the target set.
    #[tracing::instrument(skip_all, fields(organization_id = %cmd.organization_id, expense_id = %cmd.expense_id))]
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> crate::ResultEngine<EntityReceipt> {
        let now = Utc::now();
        let new_description = cmd
            .description
            .as_deref()
            .map(|value| normalize_required_name(value, "expense"))
            .transpose()?;
        let new_amount = cmd
            .amount
            .as_deref()
            .map(|value| parse_positive_amount(value, "expense amount"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, &cmd.organization_id)
                .await?;
            let model = self
                .require_expense(&db_tx, &cmd.organization_id, cmd.expense_id)
                .await?;
            let booking_id = parse_uuid(&model.booking_id, "booking")?;
            let booking = self
                .require_booking(&db_tx, &cmd.organization_id, booking_id)
                .await?;

            let mut active = expenses::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };
            let mut changed = false;
            if let Some(description) = new_description {
                active.description = ActiveValue::Set(description);
                changed = true;
            }
            if let Some(amount) = new_amount {
                active.amount_minor = ActiveValue::Set(amount.minor());
                changed = true;
            }
            if let Some(date) = cmd.spent_on {
                active.spent_on = ActiveValue::Set(Some(date));
                changed = true;
            }
            // a crew-only update carries no column changes
            if changed {
                active.update(&db_tx).await?;
            }

            let assignment_ids = self
                .apply_crew_and_touch::<ExpenseAssignments>(
                    &db_tx,
                    &cmd.organization_id,
                    &booking.id,
                    cmd.expense_id,
                    &cmd.crew,
                    now,
                )
                .await?;

            Ok(EntityReceipt {
                entity_id: cmd.expense_id,
                booking_id,
                assignment_ids,
            })
        })
    }
}
