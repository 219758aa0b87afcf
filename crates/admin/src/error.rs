//! Unified error handling for the service layer.
//!
//! Internally the services use `Result<T, ServiceError>` with `?`; at the
//! public boundary every operation converts to the
//! [`Envelope`](voltlane_core::Envelope) shape via [`IntoEnvelope`]. No
//! failure crosses the service boundary as a panic or a raw `Err`.

use thiserror::Error;

use voltlane_core::{Envelope, ErrorInfo, ErrorKind};

use crate::store::{StoreError, StoreErrorKind};

/// Application-level error type for the admin service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No caller identity was present for an operation that requires one.
    #[error("you must be signed in to perform this action")]
    Unauthenticated,

    /// Infrastructure failure while resolving the caller's role.
    #[error("could not verify permissions: {0}")]
    AuthorizationLookupFailed(String),

    /// Caller authenticated but role insufficient.
    #[error("{0}")]
    Denied(String),

    /// Requested record does not exist (or is soft-deleted).
    #[error("{0}")]
    NotFound(String),

    /// Required field missing or empty after normalization.
    #[error("{0}")]
    Validation(String),

    /// Store rejected the write due to a uniqueness constraint.
    #[error("{0}")]
    Conflict(String),

    /// Any other store or transport failure, passed through opaquely.
    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    /// The envelope classification for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::AuthorizationLookupFailed(_) => ErrorKind::AuthorizationLookupFailed,
            Self::Denied(_) => ErrorKind::Denied,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationFailed,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::StoreFailure,
        }
    }
}

/// Default mapping from gateway failures.
///
/// Services that want a more descriptive message (e.g., naming the
/// conflicting slug) map the error themselves before `?`.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::Conflict => Self::Conflict(err.message),
            StoreErrorKind::Invalid => Self::Validation(err.message),
            StoreErrorKind::PermissionDenied => {
                Self::Denied("the store's security policy rejected this operation".to_owned())
            }
            StoreErrorKind::NotFound => Self::NotFound("record not found".to_owned()),
            StoreErrorKind::Transport | StoreErrorKind::Other => Self::Store(err.message),
        }
    }
}

impl From<&ServiceError> for ErrorInfo {
    fn from(err: &ServiceError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// Conversion of an internal result into the public envelope shape.
pub trait IntoEnvelope<T> {
    /// Wrap success or failure into an [`Envelope`].
    fn into_envelope(self) -> Envelope<T>;
}

impl<T> IntoEnvelope<T> for Result<T, ServiceError> {
    fn into_envelope(self) -> Envelope<T> {
        match self {
            Ok(data) => Envelope::ok(data),
            Err(err) => {
                if err.kind().is_retryable() {
                    tracing::error!(error = %err, kind = ?err.kind(), "service operation failed");
                } else {
                    tracing::debug!(error = %err, kind = ?err.kind(), "service operation rejected");
                }
                Envelope::err(ErrorInfo::from(&err))
            }
        }
    }
}
