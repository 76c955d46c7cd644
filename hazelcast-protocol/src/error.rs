//! Error types for the Hazelcast protocol layer.

use std::io;
use thiserror::Error;

/// The main error type for protocol and connection operations.
#[derive(Debug, Error)]
pub enum HazelcastError {
    /// Connection-related errors (network failures, disconnections).
    #[error("connection error: {0}")]
    Connection(String),

    /// Protocol violations (malformed frames, bad nesting, unknown fragments).
    ///
    /// These are fatal for the connection the message arrived on.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid arguments passed by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors (invalid settings).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O errors from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HazelcastError {
    /// Returns true if this error means the connection can no longer be used.
    pub fn is_fatal_for_connection(&self) -> bool {
        matches!(
            self,
            HazelcastError::Protocol(_) | HazelcastError::Connection(_) | HazelcastError::Io(_)
        )
    }
}

/// A specialized `Result` type for Hazelcast operations.
pub type Result<T> = std::result::Result<T, HazelcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = HazelcastError::Connection("failed to connect to server".to_string());
        assert_eq!(
            err.to_string(),
            "connection error: failed to connect to server"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let err = HazelcastError::Protocol("unknown fragmentation id 7".to_string());
        assert_eq!(err.to_string(), "protocol error: unknown fragmentation id 7");
    }

    #[test]
    fn test_serialization_error_display() {
        let err = HazelcastError::Serialization("invalid UTF-8 in string frame".to_string());
        assert_eq!(
            err.to_string(),
            "serialization error: invalid UTF-8 in string frame"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = HazelcastError::InvalidArgument("page size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid argument: page size must be positive"
        );
    }

    #[test]
    fn test_configuration_error_display() {
        let err = HazelcastError::Configuration("invalid timeout value".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: invalid timeout value"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        let err: HazelcastError = io_err.into();
        assert!(matches!(err, HazelcastError::Io(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_fatal_for_connection() {
        assert!(HazelcastError::Protocol("x".into()).is_fatal_for_connection());
        assert!(HazelcastError::Connection("x".into()).is_fatal_for_connection());
        assert!(!HazelcastError::InvalidArgument("x".into()).is_fatal_for_connection());
        assert!(!HazelcastError::Serialization("x".into()).is_fatal_for_connection());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HazelcastError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(HazelcastError::Protocol("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
