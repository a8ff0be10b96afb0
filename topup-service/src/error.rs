// Service error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the input datasets
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' must contain a JSON array, found {found}", .path.display())]
    NotAnArray { path: PathBuf, found: &'static str },

    #[error("'{}': company at index {index} is malformed: {source}", .path.display())]
    InvalidCompany {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for a pipeline run
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to write report to '{}': {source}", .path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display_names_path() {
        let err = LoadError::NotAnArray {
            path: PathBuf::from("users.json"),
            found: "an object",
        };
        assert_eq!(
            err.to_string(),
            "'users.json' must contain a JSON array, found an object"
        );
    }

    #[test]
    fn test_service_error_is_transparent_for_load() {
        let err: ServiceError = LoadError::Io {
            path: PathBuf::from("missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        }
        .into();
        assert_eq!(err.to_string(), "failed to read 'missing.json': no such file");
    }
}
