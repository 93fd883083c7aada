use super::DomainError;
use thiserror::Error;

/// Application-level errors: domain violations plus infrastructure failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("permission denied")]
    Forbidden,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code, per the error-kind-to-status mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Domain(e) => match e {
                DomainError::ItemNotFound
                | DomainError::BookingNotFound
                | DomainError::CategoryNotFound
                | DomainError::ConversationNotFound => 404,
                DomainError::InvalidDateRange(_) => 400,
                DomainError::ItemInactive
                | DomainError::SelfBooking
                | DomainError::InvalidTransition
                | DomainError::BookingExpired
                | DomainError::ReviewNotEligible
                | DomainError::CategoryCycle => 422,
                DomainError::BookingOverlap | DomainError::DuplicateReview => 409,
                DomainError::NotAuthorized | DomainError::ConversationNotParticipant => 403,
                DomainError::InvalidCredentials => 401,
                DomainError::EmailAlreadyExists => 409,
                DomainError::UnknownFieldKey(_) => 400,
            },
            AppError::Database(_) | AppError::Internal(_) => 500,
            AppError::Unauthorized => 401,
            AppError::Forbidden => 403,
            AppError::NotFound(_) => 404,
            AppError::Validation(_) => 400,
        }
    }

    /// Machine-readable error code for the JSON error body.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => match e {
                DomainError::ItemNotFound => "ITEM_NOT_FOUND",
                DomainError::ItemInactive => "ITEM_INACTIVE",
                DomainError::SelfBooking => "SELF_BOOKING",
                DomainError::InvalidDateRange(_) => "INVALID_DATE_RANGE",
                DomainError::BookingOverlap => "BOOKING_OVERLAP",
                DomainError::BookingNotFound => "BOOKING_NOT_FOUND",
                DomainError::BookingExpired => "BOOKING_EXPIRED",
                DomainError::InvalidTransition => "INVALID_TRANSITION",
                DomainError::NotAuthorized => "NOT_AUTHORIZED",
                DomainError::ReviewNotEligible => "REVIEW_NOT_ELIGIBLE",
                DomainError::DuplicateReview => "DUPLICATE_REVIEW",
                DomainError::ConversationNotParticipant => "NOT_PARTICIPANT",
                DomainError::ConversationNotFound => "CONVERSATION_NOT_FOUND",
                DomainError::CategoryNotFound => "CATEGORY_NOT_FOUND",
                DomainError::CategoryCycle => "CATEGORY_CYCLE",
                DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
                DomainError::EmailAlreadyExists => "EMAIL_EXISTS",
                DomainError::UnknownFieldKey(_) => "UNKNOWN_FIELD",
            },
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", err);
        AppError::Database(err.to_string())
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
