//! The uniform result shape every service operation returns.
//!
//! Callers never receive a raw store error or a thrown fault; success and
//! failure both travel in an [`Envelope`]. The UI displays `error.message`
//! verbatim and only branches on `error.kind` to decide whether a retry
//! affordance makes sense.

use serde::{Deserialize, Serialize};

/// Classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No caller identity was present for an operation that requires one.
    Unauthenticated,
    /// Infrastructure failure while resolving the caller's role. Distinct
    /// from a policy denial; safe to retry.
    AuthorizationLookupFailed,
    /// Caller is authenticated but their role is insufficient.
    Denied,
    /// The requested record does not exist (or is soft-deleted).
    NotFound,
    /// A required field was missing or empty after normalization.
    ValidationFailed,
    /// The store rejected the write due to a uniqueness constraint.
    Conflict,
    /// Any other store or transport error.
    StoreFailure,
}

impl ErrorKind {
    /// Whether the UI should offer a retry for this failure.
    ///
    /// Policy decisions (`Denied`, `ValidationFailed`, `Conflict`) are
    /// hard stops; infrastructure failures are worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::AuthorizationLookupFailed | Self::StoreFailure)
    }
}

/// A failure carried inside an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable message, displayed verbatim by the UI.
    pub message: String,
    /// Machine-readable classification.
    pub kind: ErrorKind,
}

impl ErrorInfo {
    /// Create a new error description.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Uniform success/error return shape used by every service operation.
///
/// Exactly one of `data` and `error` is populated; `success` mirrors which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The payload, present on success.
    pub data: Option<T>,
    /// The failure description, present on error.
    pub error: Option<ErrorInfo>,
}

impl<T> Envelope<T> {
    /// Wrap a successful payload.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Wrap a failure.
    #[must_use]
    pub const fn err(error: ErrorInfo) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Convert into a plain `Result`, useful in tests and at call sites
    /// that want `?` ergonomics.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ErrorInfo`] when the envelope is a failure.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(error)) => Err(error),
            (None, None) => Err(ErrorInfo::new(
                ErrorKind::StoreFailure,
                "envelope carried neither data nor error",
            )),
        }
    }
}
