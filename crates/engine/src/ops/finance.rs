//! Financial invariant validator.
//!
//! Two rules protect a booking's money shape:
//!
//! - the sum of received and scheduled payments never exceeds the package
//!   cost;
//! - the package cost can never be reduced below what has already been
//!   collected or promised.
//!
//! The checks themselves are pure functions; the aggregate they need is read
//! from storage *inside the same transaction* that will commit the change,
//! so a concurrent payment insert and a cost reduction serialize instead of
//! interleaving.

use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

use super::Engine;

/// Sum a list of amounts with overflow checking.
pub(super) fn sum_amounts<I>(amounts: I) -> ResultEngine<Money>
where
    I: IntoIterator<Item = Money>,
{
    let mut total = Money::ZERO;
    for amount in amounts {
        total = total
            .checked_add(amount)
            .ok_or_else(|| EngineError::InvalidAmount("payment total overflows".to_string()))?;
    }
    Ok(total)
}

/// Creation/overall check: committed payments must fit inside the package
/// cost, boundary included.
pub(super) fn ensure_payments_within_cost(
    package_cost: Money,
    committed: Money,
) -> ResultEngine<()> {
    if committed > package_cost {
        return Err(EngineError::PaymentsExceedPackageCost(format!(
            "payments {committed} exceed package cost {package_cost}"
        )));
    }
    Ok(())
}

/// Cost-reduction check: a new, lower package cost must still cover every
/// payment already collected or promised.
pub(super) fn ensure_cost_covers_committed(
    new_cost: Money,
    committed: Money,
) -> ResultEngine<()> {
    if committed > new_cost {
        return Err(EngineError::CostBelowCommittedPayments(format!(
            "committed payments {committed} exceed new package cost {new_cost}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Returns `sum(received) + sum(scheduled)` for a booking, read from
    /// storage inside the current transaction.
    pub(super) async fn committed_payment_total(
        &self,
        db_tx: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<Money> {
        let backend = db_tx.get_database_backend();
        let booking_id = booking_id.to_string();

        let received_minor: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                 FROM received_payments WHERE booking_id = ?",
                vec![booking_id.clone().into()],
            );
            let row = db_tx.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let scheduled_minor: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                 FROM scheduled_payments WHERE booking_id = ?",
                vec![booking_id.into()],
            );
            let row = db_tx.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        Money::new(received_minor)
            .checked_add(Money::new(scheduled_minor))
            .ok_or_else(|| EngineError::InvalidAmount("payment total overflows".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_is_checked() {
        let total = sum_amounts([Money::new(100), Money::new(250)]).unwrap();
        assert_eq!(total, Money::new(350));
        assert!(sum_amounts([Money::new(i64::MAX), Money::new(1)]).is_err());
    }

    #[test]
    fn payments_at_exact_cost_pass() {
        assert!(ensure_payments_within_cost(Money::new(10_000_000), Money::new(10_000_000)).is_ok());
    }

    #[test]
    fn one_minor_unit_over_cost_fails() {
        let err = ensure_payments_within_cost(Money::new(10_000_000), Money::new(10_000_001))
            .unwrap_err();
        assert!(matches!(err, EngineError::PaymentsExceedPackageCost(_)));
    }

    #[test]
    fn cost_reduction_below_committed_fails() {
        let err =
            ensure_cost_covers_committed(Money::new(8_000_000), Money::new(9_000_000)).unwrap_err();
        assert!(matches!(err, EngineError::CostBelowCommittedPayments(_)));
    }

    #[test]
    fn cost_reduction_above_committed_passes() {
        assert!(ensure_cost_covers_committed(Money::new(9_500_000), Money::new(9_000_000)).is_ok());
        assert!(ensure_cost_covers_committed(Money::new(9_000_000), Money::new(9_000_000)).is_ok());
    }
}
