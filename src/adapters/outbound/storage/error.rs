use crate::{domain::value_objects::ObjectKey, ports::storage::ClientError};

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Other(format!("HTTP request failed: {}", err))
    }
}

/// Map an `object_store` failure for a specific object, turning the
/// backend's not-found into the structured `NoSuchKey` the service layer
/// keys its existence policy on.
pub(crate) fn object_error(err: object_store::Error, key: &ObjectKey) -> ClientError {
    match err {
        object_store::Error::NotFound { .. } => ClientError::NoSuchKey {
            key: key.as_str().to_string(),
        },
        other => ClientError::ObjectStore(other),
    }
}

/// Translate a `reqwest` status into the `http` crate's type used in
/// [`ClientError::Http`]; the two crates ship different status types.
pub(crate) fn http_status(status: reqwest::StatusCode) -> http::StatusCode {
    http::StatusCode::from_u16(status.as_u16())
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
}
