//! Error types and handling for the preschool directory

use thiserror::Error;

/// Main error type for the directory application
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Lookup of a record that does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The built-in dataset could not be loaded
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DirectoryError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            DirectoryError::Validation { message } => format!("Invalid input: {message}"),
            DirectoryError::NotFound { message } => format!("Not found: {message}"),
            DirectoryError::Dataset { .. } => {
                "The preschool dataset could not be loaded.".to_string()
            }
            DirectoryError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }

    /// HTTP status matching this error
    #[must_use]
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DirectoryError::Validation { .. } => StatusCode::BAD_REQUEST,
            DirectoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_creation() {
        let config_err = DirectoryError::config("bad port");
        assert!(matches!(config_err, DirectoryError::Config { .. }));

        let validation_err = DirectoryError::validation("min_rating must be a number");
        assert!(matches!(validation_err, DirectoryError::Validation { .. }));

        let missing = DirectoryError::not_found("preschool 99");
        assert!(matches!(missing, DirectoryError::NotFound { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = DirectoryError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = DirectoryError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));

        let missing = DirectoryError::not_found("preschool 42");
        assert_eq!(missing.user_message(), "Not found: preschool 42");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DirectoryError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DirectoryError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DirectoryError::dataset("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DirectoryError = io_err.into();
        assert!(matches!(err, DirectoryError::Io { .. }));
    }
}
