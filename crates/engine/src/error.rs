//! The module contains the errors the engine can throw.
//!
//! Every write operation either succeeds atomically or fails with one of
//! these kinds, leaving storage untouched:
//!
//! - [`Unscoped`] when the caller carries no usable organization context.
//! - [`NotFound`] when a referenced row does not exist *for this tenant*
//!   (cross-tenant rows are indistinguishable from missing ones by design).
//! - [`TransactionAborted`] when the storage layer fails mid-sequence; the
//!   whole transaction is rolled back.
//!
//!  [`Unscoped`]: EngineError::Unscoped
//!  [`NotFound`]: EngineError::NotFound
//!  [`TransactionAborted`]: EngineError::TransactionAborted

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::BookingStatus;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no organization context: {0}")]
    Unscoped(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("booking name \"{0}\" already taken")]
    DuplicateBookingName(String),
    #[error("payments exceed package cost: {0}")]
    PaymentsExceedPackageCost(String),
    #[error("package cost below committed payments: {0}")]
    CostBelowCommittedPayments(String),
    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("invalid crew references: {0:?}")]
    InvalidCrewReferences(Vec<Uuid>),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("transaction aborted: {0}")]
    TransactionAborted(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unscoped(a), Self::Unscoped(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::DuplicateBookingName(a), Self::DuplicateBookingName(b)) => a == b,
            (Self::PaymentsExceedPackageCost(a), Self::PaymentsExceedPackageCost(b)) => a == b,
            (Self::CostBelowCommittedPayments(a), Self::CostBelowCommittedPayments(b)) => a == b,
            (
                Self::InvalidTransition { from: a, to: b },
                Self::InvalidTransition { from: c, to: d },
            ) => a == c && b == d,
            (Self::InvalidCrewReferences(a), Self::InvalidCrewReferences(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::TransactionAborted(a), Self::TransactionAborted(b)) => {
                a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}
