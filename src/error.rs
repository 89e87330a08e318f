use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("hour must be between 1 and 12: {0}")]
    InvalidHour(u32),

    #[error("minute must be one of 00, 15, 30, 45: {0}")]
    InvalidMinute(u32),

    #[error("month must be between 1 and 12: {0}")]
    InvalidMonth(u32),

    #[error("unknown time format: {0}")]
    InvalidTime(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("{0} cannot be booked")]
    UnselectableDate(chrono::NaiveDate),

    #[error("select a date first")]
    NoDateSelected,

    #[error("unknown venue: {0}")]
    UnknownVenue(String),

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("{name} is unavailable: {reason}")]
    PaymentMethodDisabled { name: String, reason: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("log in first")]
    NotLoggedIn,

    #[error("Please select at least one sport to add.")]
    NoSportSelected,

    #[error("unknown chat: {0}")]
    UnknownChat(String),

    #[error("choose activity, location, sport, date and time first")]
    SearchIncomplete,

    #[error("unknown {kind}: {value}")]
    UnknownSearchOption { kind: &'static str, value: String },

    #[error("cannot {action} during {stage}")]
    WrongStage { action: &'static str, stage: &'static str },

    #[error("failed to read {path}: {message}")]
    FixtureRead { path: String, message: String },

    #[error("malformed fixture {path}: {message}")]
    FixtureParse { path: String, message: String },
}
