use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::DomainError;

/// The 48-hour wall-clock deadline tied to `Clock::now`, not to any
/// transaction's lifetime.
pub const EXPIRY_THRESHOLD_HOURS: i64 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    PaymentPending,
    Completed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::PaymentPending => "PAYMENT_PENDING",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "APPROVED" => Some(BookingStatus::Approved),
            "PAYMENT_PENDING" => Some(BookingStatus::PaymentPending),
            "COMPLETED" => Some(BookingStatus::Completed),
            "REJECTED" => Some(BookingStatus::Rejected),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses whose date range participates in the overlap invariant.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Approved | BookingStatus::PaymentPending
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Rejected | BookingStatus::Cancelled
        )
    }
}

/// The two roles with standing to act on a booking. A caller who is
/// neither is rejected before this type is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Renter,
    Owner,
}

/// Validate a requested status transition against the transition table.
/// This is the sole authority for legality — no caller should special-case
/// a transition outside of it.
///
/// Does not check expiration; callers must additionally call
/// [`check_not_expired`] for `Pending -> Approved`.
pub fn authorize_transition(
    from: BookingStatus,
    to: BookingStatus,
    actor: BookingActor,
) -> Result<(), DomainError> {
    use BookingActor::Owner;
    use BookingStatus::*;

    let allowed_actor = match (from, to) {
        (Pending, Approved) => Some(Owner),
        (Pending, Rejected) => Some(Owner),
        (Pending, Cancelled) => None, // either
        (Approved, PaymentPending) => Some(Owner),
        (Approved, Cancelled) => None, // either
        (PaymentPending, Completed) => Some(Owner),
        (PaymentPending, Cancelled) => None, // either
        _ => return Err(DomainError::InvalidTransition),
    };

    match allowed_actor {
        Some(required) if required != actor => Err(DomainError::NotAuthorized),
        _ => Ok(()),
    }
}

/// `Pending -> Approved` fails with `BookingExpired` once 48 hours have
/// elapsed since `created_at`. No other transition is sensitive to this.
pub fn check_not_expired(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if now - created_at >= Duration::hours(EXPIRY_THRESHOLD_HOURS) {
        Err(DomainError::BookingExpired)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingActor::{Owner, Renter};
    use BookingStatus::*;

    #[test]
    fn test_pending_to_approved_requires_owner() {
        assert!(authorize_transition(Pending, Approved, Owner).is_ok());
        assert!(matches!(
            authorize_transition(Pending, Approved, Renter),
            Err(DomainError::NotAuthorized)
        ));
    }

    #[test]
    fn test_pending_to_cancelled_either_actor() {
        assert!(authorize_transition(Pending, Cancelled, Owner).is_ok());
        assert!(authorize_transition(Pending, Cancelled, Renter).is_ok());
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        for terminal in [Completed, Rejected, Cancelled] {
            for target in [Pending, Approved, PaymentPending, Completed, Rejected, Cancelled] {
                assert!(matches!(
                    authorize_transition(terminal, target, Owner),
                    Err(DomainError::InvalidTransition)
                ));
            }
        }
    }

    #[test]
    fn test_illegal_edge_rejected() {
        assert!(matches!(
            authorize_transition(Pending, PaymentPending, Owner),
            Err(DomainError::InvalidTransition)
        ));
        assert!(matches!(
            authorize_transition(Pending, Completed, Owner),
            Err(DomainError::InvalidTransition)
        ));
    }

    #[test]
    fn test_s4_expiry_boundary() {
        use chrono::TimeZone;
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        let just_before = created + Duration::hours(47) + Duration::minutes(59);
        assert!(check_not_expired(created, just_before).is_ok());

        let just_after = created + Duration::hours(48) + Duration::seconds(1);
        assert!(matches!(
            check_not_expired(created, just_after),
            Err(DomainError::BookingExpired)
        ));

        let exactly_at = created + Duration::hours(48);
        assert!(matches!(
            check_not_expired(created, exactly_at),
            Err(DomainError::BookingExpired)
        ));
    }

    #[test]
    fn test_active_vs_terminal() {
        assert!(Pending.is_active());
        assert!(Approved.is_active());
        assert!(PaymentPending.is_active());
        assert!(!Completed.is_active());
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(Cancelled.is_terminal());
    }
}
