use thiserror::Error;

/// Business-rule violations raised by the booking kernel.
///
/// Each variant corresponds to a named failure in the booking admission
/// pipeline, state machine, review service, or messaging service. The
/// HTTP-facing status/code mapping lives on [`super::AppError`].
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("item not found")]
    ItemNotFound,

    #[error("item is not active")]
    ItemInactive,

    #[error("renter and owner cannot be the same user")]
    SelfBooking,

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("booking dates overlap an existing active booking for this item")]
    BookingOverlap,

    #[error("booking not found")]
    BookingNotFound,

    #[error("booking can no longer be approved: more than 48 hours have elapsed")]
    BookingExpired,

    #[error("illegal status transition")]
    InvalidTransition,

    #[error("actor is not authorized to perform this action")]
    NotAuthorized,

    #[error("booking is not eligible for review")]
    ReviewNotEligible,

    #[error("a review for this booking and direction already exists")]
    DuplicateReview,

    #[error("actor is not a participant of this conversation")]
    ConversationNotParticipant,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error("category not found")]
    CategoryNotFound,

    #[error("category parent reference would create a cycle")]
    CategoryCycle,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailAlreadyExists,

    #[error("unrecognized field key: {0}")]
    UnknownFieldKey(String),
}
