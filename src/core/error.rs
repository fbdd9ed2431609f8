//! Analyzer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors that can occur while loading, analyzing, or rendering a role.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A document exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed as YAML.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The graph rendering backend could not be started.
    #[error("Graph backend '{command}' is unavailable: {source}")]
    GraphBackend {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The graph rendering backend ran but failed.
    #[error("Graph rendering failed: {0}")]
    Render(String),

    /// An output artifact could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    /// Path of the document or artifact involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => {
                Some(path)
            }
            Self::GraphBackend { .. } | Self::Render(_) => None,
        }
    }

    /// Whether this error came from parsing a document.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_path() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let err = AnalyzerError::Parse { path: PathBuf::from("tasks/main.yml"), source };

        assert!(err.to_string().starts_with("Failed to parse tasks/main.yml"));
        assert!(err.is_parse_error());
        assert_eq!(err.path(), Some(std::path::Path::new("tasks/main.yml")));
    }

    #[test]
    fn test_render_error_has_no_path() {
        let err = AnalyzerError::Render("exit status 1".to_string());
        assert!(err.path().is_none());
        assert!(!err.is_parse_error());
        assert_eq!(err.to_string(), "Graph rendering failed: exit status 1");
    }
}
