//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP dispatcher maps each
//! [`ErrorCode`] to a status and renders the message into the response
//! envelope; nothing below the dispatcher logs or formats responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Field name to human readable message, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Message used for every field-level validation failure.
pub const VALIDATION_MESSAGE: &str = "data validation error";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// One or more input fields failed validation.
    Validation,
    /// The request is malformed.
    InvalidRequest,
    /// An identifier is not a positive integer.
    InvalidId,
    /// The requested resource does not exist or is soft-deleted.
    NotFound,
    /// A uniqueness constraint rejected the write.
    Conflict,
    /// The service can no longer operate and must shut down.
    Shutdown,
    /// An unexpected error occurred inside the domain.
    Internal,
}

impl ErrorCode {
    /// Whether the failure was caused by the caller rather than the service.
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::InvalidRequest | Self::InvalidId | Self::NotFound | Self::Conflict
        )
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `fields` is only populated for [`ErrorCode::Validation`].
/// - `diagnostic` never leaves the process; adapters may log it but must not
///   send it to clients.
///
/// # Examples
/// ```
/// use employee_service::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("employee not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "employee not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    fields: Option<FieldErrors>,
    diagnostic: Option<String>,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: None,
            diagnostic: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Per-field validation messages, if any.
    pub fn fields(&self) -> Option<&FieldErrors> {
        self.fields.as_ref()
    }

    /// Server-side diagnostic such as a captured backtrace.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Attach a server-side diagnostic to the error.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Field-level validation failure.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use employee_service::domain::{Error, ErrorCode};
    ///
    /// let fields = BTreeMap::from([("name".to_owned(), "name cannot be blank".to_owned())]);
    /// let err = Error::validation(fields);
    /// assert_eq!(err.code(), ErrorCode::Validation);
    /// assert_eq!(err.message(), "data validation error");
    /// ```
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            fields: Some(fields),
            ..Self::new(ErrorCode::Validation, VALIDATION_MESSAGE)
        }
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidId`].
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidId, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::Shutdown`].
    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Shutdown, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
