//! Payment operations on an existing booking.
//!
//! Both operations re-read the committed payment total from storage inside
//! the write transaction before accepting the new amount, so a concurrent
//! cost reduction or another payment insert serializes instead of slipping
//! past the invariant.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, received_payments, scheduled_payments};

use super::{Engine, finance, normalize_optional_text, normalize_required_name, parse_positive_amount, with_tx};

impl Engine {
    /// Record money already collected against a booking.
    #[tracing::instrument(skip_all, fields(organization_id = %organization_id, booking_id = %booking_id))]
    pub async fn record_received_payment(
        &self,
        organization_id: &str,
        booking_id: Uuid,
        amount: &str,
        description: Option<&str>,
        paid_on: NaiveDate,
    ) -> crate::ResultEngine<Uuid> {
        let now = Utc::now();
        let amount = parse_positive_amount(amount, "received payment amount")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let booking = self
                .require_booking(&db_tx, organization_id, booking_id)
                .await?;

            let committed = self
                .committed_payment_total(&db_tx, booking_id)
                .await?
                .checked_add(amount)
                .ok_or_else(|| {
                    EngineError::InvalidAmount("payment total overflows".to_string())
                })?;
            finance::ensure_payments_within_cost(
                Money::new(booking.package_cost_minor),
                committed,
            )?;

            let payment_id = Uuid::new_v4();
            let row = received_payments::ActiveModel {
                id: ActiveValue::Set(payment_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(organization_id.to_string()),
                amount_minor: ActiveValue::Set(amount.minor()),
                description: ActiveValue::Set(normalize_optional_text(description)),
                paid_on: ActiveValue::Set(paid_on),
            };
            row.insert(&db_tx).await?;

            self.touch_booking(&db_tx, &booking.id, now).await?;
            Ok(payment_id)
        })
    }

    /// Schedule money expected in the future against a booking.
    #[tracing::instrument(skip_all, fields(organization_id = %organization_id, booking_id = %booking_id))]
    pub async fn schedule_payment(
        &self,
        organization_id: &str,
        booking_id: Uuid,
        amount: &str,
        description: &str,
        due_on: NaiveDate,
    ) -> crate::ResultEngine<Uuid> {
        let now = Utc::now();
        let amount = parse_positive_amount(amount, "scheduled payment amount")?;
        let description = normalize_required_name(description, "scheduled payment")?;

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let booking = self
                .require_booking(&db_tx, organization_id, booking_id)
                .await?;

            let committed = self
                .committed_payment_total(&db_tx, booking_id)
                .await?
                .checked_add(amount)
                .ok_or_else(|| {
                    EngineError::InvalidAmount("payment total overflows".to_string())
                })?;
            finance::ensure_payments_within_cost(
                Money::new(booking.package_cost_minor),
                committed,
            )?;

            let payment_id = Uuid::new_v4();
            let row = scheduled_payments::ActiveModel {
                id: ActiveValue::Set(payment_id.to_string()),
                booking_id: ActiveValue::Set(booking.id.clone()),
                organization_id: ActiveValue::Set(organization_id.to_string()),
                amount_minor: ActiveValue::Set(amount.minor()),
                description: ActiveValue::Set(description),
                due_on: ActiveValue::Set(due_on),
            };
            row.insert(&db_tx).await?;

            self.touch_booking(&db_tx, &booking.id, now).await?;
            Ok(payment_id)
        })
    }
}
