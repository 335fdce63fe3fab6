//! Error types for the EDSDK helper layer
//!
//! Every helper in `crate::eds` returns [`Result`]. Native statuses are never
//! reinterpreted: a failing call is wrapped together with the name of the
//! operation that produced it so the message carries both.

use crate::sdk::Status;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the helper layer
#[derive(Error, Debug)]
pub enum EdsError {
    /// The SDK returned a non-zero status
    #[error("{operation} failed: {status}")]
    Device {
        operation: &'static str,
        status: Status,
    },

    /// The camera cannot serve the request yet; retrying later may succeed
    #[error("{operation} not ready: {status}")]
    Unavailable {
        operation: &'static str,
        status: Status,
    },

    /// Frame bytes could not be decoded as an image
    #[error("Failed to decode live view frame: {0}")]
    Decode(#[from] image::ImageError),

    /// Local filesystem operation failed
    #[error("Filesystem error at '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A frame was requested while live view is off
    #[error("Live view is not enabled")]
    LiveViewDisabled,

    /// The binding refused a memory view longer than the stream
    #[error("Requested {requested} bytes from a stream holding {available}")]
    InvalidView { requested: u64, available: u64 },

    /// The camera reported a file name that does not name a single file
    #[error("Camera reported an unusable file name: '{0}'")]
    InvalidFileName(String),

    /// The native library could not be loaded or is incomplete
    #[error("EDSDK library error: {0}")]
    Library(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EdsError>;

impl EdsError {
    /// Wrap a failing status, classifying it as transient or hard
    pub fn device(operation: &'static str, status: Status) -> Self {
        if status.is_transient() {
            EdsError::Unavailable { operation, status }
        } else {
            EdsError::Device { operation, status }
        }
    }

    /// Attach a path to an I/O error
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EdsError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same operation later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, EdsError::Unavailable { .. })
    }

    /// The native status behind this error, if there is one
    pub fn status(&self) -> Option<Status> {
        match self {
            EdsError::Device { status, .. } => Some(*status),
            EdsError::Unavailable { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Turn a status into a `Result`, naming the operation on failure
pub(crate) fn check(operation: &'static str, status: Status) -> Result<()> {
    status
        .ok()
        .map_err(|status| EdsError::device(operation, status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_classification() {
        let err = EdsError::device("EdsDownloadEvfImage", Status::OBJECT_NOTREADY);
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(Status::OBJECT_NOTREADY));

        let err = EdsError::device("EdsSetPropertyData", Status::INVALID_LENGTH);
        assert!(!err.is_transient());
        assert!(matches!(err, EdsError::Device { .. }));
    }

    #[test]
    fn test_device_error_message_names_status() {
        let err = EdsError::device("EdsGetPropertyData", Status::INVALID_HANDLE);
        let message = err.to_string();
        assert!(message.contains("EdsGetPropertyData"));
        assert!(message.contains("EDS_ERR_INVALID_HANDLE"));
        assert!(message.contains("0x00000061"));
    }

    #[test]
    fn test_check() {
        assert!(check("EdsRelease", Status::OK).is_ok());
        assert!(check("EdsDownload", Status::DEVICE_BUSY)
            .unwrap_err()
            .is_transient());
    }

    #[test]
    fn test_non_device_errors_have_no_status() {
        assert_eq!(EdsError::LiveViewDisabled.status(), None);
        assert!(!EdsError::LiveViewDisabled.is_transient());
    }
}
