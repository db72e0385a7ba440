use thiserror::Error;

/// Failure reported by a submit handler. The composer turns it into a single
/// notification; the message is only shown when the caller supplied none.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { message: String },

    #[error("Server responded with {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Could not decode server response: {message}")]
    Decode { message: String },
}

impl SubmitError {
    pub fn rejected(message: impl Into<String>) -> Self {
        SubmitError::Rejected {
            message: message.into(),
        }
    }
}

impl From<ClientError> for SubmitError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Http { status, body } => SubmitError::Http {
                status,
                message: body,
            },
            ClientError::Network { message } => SubmitError::Network { message },
            ClientError::Decode { message } => SubmitError::Decode { message },
            ClientError::InvalidUrl { url } => SubmitError::Rejected {
                message: format!("Invalid endpoint: {}", url),
            },
        }
    }
}

/// Errors raised by the REST client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode {
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            ClientError::Http {
                status: status.as_u16(),
                body: error.to_string(),
            }
        } else {
            ClientError::Network {
                message: error.to_string(),
            }
        }
    }
}

/// Snapshot store failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage backend unavailable: {backend}")]
    Unavailable { backend: String },

    #[error("Snapshot serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("Storage quota exceeded for key {key}")]
    Quota { key: String },
}

impl From<gloo_storage::errors::StorageError> for StorageError {
    fn from(error: gloo_storage::errors::StorageError) -> Self {
        match error {
            gloo_storage::errors::StorageError::SerdeError(e) => StorageError::Serialization {
                reason: e.to_string(),
            },
            other => StorageError::Unavailable {
                backend: format!("localStorage ({})", other),
            },
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Serialization {
            reason: error.to_string(),
        }
    }
}

/// Rejections raised synchronously when a file is picked.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FileConstraintError {
    #[error("File size exceeds maximum limit of {max_label}MB")]
    TooLarge { max_label: String, size_bytes: u64 },

    #[error("File type {mime} is not allowed. Accepted types: {accepted}")]
    DisallowedType { mime: String, accepted: String },

    #[error("Could not determine the size of {name}")]
    UnknownSize { name: String },
}
