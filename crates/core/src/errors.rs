use std::fmt;

use thiserror::Error;

/// The kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Provider,
    Customer,
    Service,
    Booking,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Provider => "provider",
            EntityKind::Customer => "customer",
            EntityKind::Service => "service",
            EntityKind::Booking => "booking",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The requested timeslot is not available for booking")]
    TimeslotConflict,

    #[error("Resource not found: {0}")]
    NotFound(EntityKind),

    #[error("Database error: {0:#}")]
    Database(#[from] eyre::Report),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }

    /// Infrastructure failures are the only errors worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::Database(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
