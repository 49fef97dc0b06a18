//! Mapping of session and transport failures into `AppError`

use storefront_common::AppError;
use storefront_session::{SessionError, TransportError};

pub(crate) fn from_transport(err: TransportError) -> AppError {
    match err {
        TransportError::AuthorizationDenied => AppError::NotAuthenticated,
        TransportError::Status { status, message } => AppError::from_status(status, message),
        TransportError::Network(message) => AppError::Network(message),
        TransportError::Codec(message) => AppError::Decode(message),
    }
}

pub(crate) fn from_session(err: SessionError) -> AppError {
    match err {
        SessionError::Transport(err) => from_transport(err),
        SessionError::RenewalFailed(_) => AppError::SessionExpired,
        SessionError::Store(err) => AppError::Storage(err.to_string()),
    }
}
