//! Booking lifecycle states and the allowed transitions between them.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Lifecycle state of a booking.
///
/// Bookings are always created as `New`; the creation path does not accept an
/// arbitrary initial status. `Completed` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    New,
    Preparation,
    Shooting,
    Delivery,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Preparation => "preparation",
            Self::Shooting => "shooting",
            Self::Delivery => "delivery",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` if no further transitions are allowed from this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if the directed edge `self -> to` exists in the
    /// transition table.
    ///
    /// A no-op transition (`self == to`) is not an edge; callers skip the
    /// check entirely in that case.
    #[must_use]
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (New, Preparation)
                | (New, Cancelled)
                | (Preparation, Shooting)
                | (Preparation, Cancelled)
                | (Shooting, Delivery)
                | (Shooting, Cancelled)
                | (Delivery, Completed)
                | (Delivery, Cancelled)
        )
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "new" => Ok(Self::New),
            "preparation" => Ok(Self::Preparation),
            "shooting" => Ok(Self::Shooting),
            "delivery" => Ok(Self::Delivery),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidName(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BookingStatus; 6] = [
        BookingStatus::New,
        BookingStatus::Preparation,
        BookingStatus::Shooting,
        BookingStatus::Delivery,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    #[test]
    fn forward_edges_exist() {
        assert!(BookingStatus::New.can_transition_to(BookingStatus::Preparation));
        assert!(BookingStatus::Preparation.can_transition_to(BookingStatus::Shooting));
        assert!(BookingStatus::Shooting.can_transition_to(BookingStatus::Delivery));
        assert!(BookingStatus::Delivery.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn every_active_state_can_cancel() {
        for from in ALL {
            if !from.is_terminal() {
                assert!(from.can_transition_to(BookingStatus::Cancelled), "{from:?}");
            }
        }
    }

    #[test]
    fn terminal_states_have_no_edges() {
        for to in ALL {
            assert!(!BookingStatus::Completed.can_transition_to(to));
            assert!(!BookingStatus::Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn no_backward_or_skipping_edges() {
        assert!(!BookingStatus::New.can_transition_to(BookingStatus::Shooting));
        assert!(!BookingStatus::Shooting.can_transition_to(BookingStatus::Preparation));
        assert!(!BookingStatus::Preparation.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Delivery.can_transition_to(BookingStatus::New));
    }

    #[test]
    fn round_trips_through_str() {
        for status in ALL {
            assert_eq!(BookingStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(BookingStatus::try_from("archived").is_err());
    }
}
