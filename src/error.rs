use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// User-facing error codes surfaced to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    PaymentNotFound,
    InvalidInput,
    DateParseFailure,
    PayeeResolutionFailure,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PaymentNotFound => "PAYMENT_NOT_FOUND",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::DateParseFailure => "DATE_PARSE_FAILURE",
            ErrorCode::PayeeResolutionFailure => "PAYEE_RESOLUTION_FAILURE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{code}: {message}")]
    NotFound { code: ErrorCode, message: String },
    #[error("Date parse error: {0}")]
    ParseError(String),
    #[error("Payee resolution error: {0}")]
    PayeeResolution(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}

impl PaymentError {
    /// Not-found error shared by payment and transaction lookups so that a
    /// record owned by another client looks exactly like a missing one.
    pub fn payment_not_found(message: impl Into<String>) -> Self {
        PaymentError::NotFound {
            code: ErrorCode::PaymentNotFound,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        PaymentError::Storage(Box::new(std::io::Error::other(message.into())))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::InvalidArgument(_) | PaymentError::Conflict(_) => ErrorCode::InvalidInput,
            PaymentError::NotFound { code, .. } => *code,
            PaymentError::ParseError(_) => ErrorCode::DateParseFailure,
            PaymentError::PayeeResolution(_) => ErrorCode::PayeeResolutionFailure,
            _ => ErrorCode::InternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_code() {
        let err = PaymentError::payment_not_found("Payment 1 not found");
        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
        assert_eq!(err.to_string(), "PAYMENT_NOT_FOUND: Payment 1 not found");
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        let err = PaymentError::storage("disk on fire");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(
            PaymentError::InvalidArgument("x".to_string()).code(),
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_conflict_is_invalid_input() {
        let err = PaymentError::Conflict("entry (1, 1) already exists".to_string());
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(err.to_string(), "Conflict: entry (1, 1) already exists");
    }
}
