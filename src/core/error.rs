//! Error types for flight-surety.

use thiserror::Error;

/// Result type alias for flight-surety operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in flight-surety operations.
///
/// The first group are guard rejections: a rejected call leaves every piece of
/// state untouched and may be retried, possibly by a different caller.
#[derive(Error, Debug)]
pub enum Error {
    // Shared guard
    #[error("System is currently not operational")]
    NotOperational,

    // Governance errors
    #[error("Caller is not a registered airline")]
    CallerNotRegistered,

    #[error("Caller is not a funded airline")]
    CallerNotFunded,

    #[error("Identity is already registered")]
    AlreadyRegistered,

    #[error("Airline is already funded")]
    AlreadyFunded,

    #[error("Required minimum funding is {required}, got {provided}")]
    InsufficientFunds { required: u128, provided: u128 },

    #[error("New status must be different from existing status")]
    NoStatusChange,

    #[error("Caller has already voted")]
    AlreadyVoted,

    // Oracle errors
    #[error("Caller is not a registered oracle")]
    NotRegisteredOracle,

    #[error("Index {0} does not match any of the caller's oracle indexes")]
    IndexMismatch(u8),

    #[error("No open request matches the submitted response")]
    NoMatchingRequest,

    #[error("Oracle has already responded to this request")]
    AlreadyResponded,

    #[error("Registration fee is {required}, got {provided}")]
    InsufficientFee { required: u128, provided: u128 },

    // Input errors
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u8),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable name of the failure reason.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotOperational => "NotOperational",
            Error::CallerNotRegistered => "CallerNotRegistered",
            Error::CallerNotFunded => "CallerNotFunded",
            Error::AlreadyRegistered => "AlreadyRegistered",
            Error::AlreadyFunded => "AlreadyFunded",
            Error::InsufficientFunds { .. } => "InsufficientFunds",
            Error::NoStatusChange => "NoStatusChange",
            Error::AlreadyVoted => "AlreadyVoted",
            Error::NotRegisteredOracle => "NotRegisteredOracle",
            Error::IndexMismatch(_) => "IndexMismatch",
            Error::NoMatchingRequest => "NoMatchingRequest",
            Error::AlreadyResponded => "AlreadyResponded",
            Error::InsufficientFee { .. } => "InsufficientFee",
            Error::InvalidStatusCode(_) => "InvalidStatusCode",
            Error::InvalidIdentity(_) => "InvalidIdentity",
            Error::InvalidConfig(_) => "InvalidConfig",
            Error::SerializationError(_) => "SerializationError",
            Error::Io(_) => "Io",
        }
    }

    /// Whether this error is a guard rejection of an operation.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Error::InvalidStatusCode(_)
                | Error::InvalidIdentity(_)
                | Error::InvalidConfig(_)
                | Error::SerializationError(_)
                | Error::Io(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidIdentity(err.to_string())
    }
}
