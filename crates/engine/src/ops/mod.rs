use sea_orm::DatabaseConnection;

use crate::{EngineError, Money, ResultEngine};

mod access;
mod assignments;
mod bookings;
mod deliverables;
mod expenses;
mod finance;
mod payments;
mod shoots;
mod tasks;

pub use bookings::BookingSnapshot;

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error.
///
/// The transaction opens before the block's first read and commits after its
/// last write, so every check-then-act sequence inside is race-free against
/// concurrent writers on the same rows.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The engine owns a database connection and exposes the transactional write
/// path for booking aggregates and their crew assignments.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Parse a decimal-string amount and reject negatives.
fn parse_amount(value: &str, label: &str) -> ResultEngine<Money> {
    let amount: Money = value.parse()?;
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not be negative"
        )));
    }
    Ok(amount)
}

/// Parse a decimal-string amount and reject zero or negative values.
fn parse_positive_amount(value: &str, label: &str) -> ResultEngine<Money> {
    let amount = parse_amount(value, label)?;
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(amount)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
