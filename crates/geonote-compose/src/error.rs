use geonote_core::AppError;
use geonote_location::{AcquireError, LookupError};
use thiserror::Error;

/// Failure of a resolution cycle.
///
/// Address and weather failures are not errors here; they only leave the
/// corresponding values empty.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to get location")]
    LocationUnavailable(#[from] AcquireError),

    /// The lookup clients could not be built from the service settings.
    #[error("Failed to set up lookups: {0}")]
    Setup(#[from] LookupError),
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Malformed frontmatter: {0}")]
    Frontmatter(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ComposeError> for AppError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::LocationUnavailable(e) => AppError::LocationUnavailable(e.to_string()),
            ComposeError::Setup(LookupError::Network(e)) => AppError::Network(e),
            ComposeError::Setup(e) => AppError::Other(anyhow::anyhow!(e)),
        }
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        match err {
            NoteError::Io(e) => AppError::Io(e),
            other => AppError::Note(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_failure_message() {
        let app: AppError = ComposeError::from(AcquireError::Unavailable).into();
        assert_eq!(app.user_message(), "Failed to get location");
        assert_eq!(
            ComposeError::from(AcquireError::Unavailable).to_string(),
            "Failed to get location"
        );
        assert_eq!(
            app.to_string(),
            "Location unavailable: All position sources failed"
        );
    }

    #[test]
    fn test_note_error_mapping() {
        let app: AppError = NoteError::Frontmatter("unclosed".into()).into();
        assert!(matches!(app, AppError::Note(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let app: AppError = NoteError::from(io).into();
        assert!(matches!(app, AppError::Io(_)));
    }
}
