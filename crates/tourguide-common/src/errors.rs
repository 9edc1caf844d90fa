use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

/// Failures of the side collaborators (tourism text, images, weather).
///
/// These never abort a turn: callers log them and disable the feature.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{what} unavailable at {path}: {reason}")]
    Unavailable {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("{what} is malformed: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("weather service error: {0}")]
    Weather(String),
}

impl CollaboratorError {
    pub fn unavailable(what: &'static str, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unavailable {
            what,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TourGuideError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("rate_limit.window_secs = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: rate_limit.window_secs = 0"
        );

        let err = ConfigError::MissingCredential("GEMINI_API_KEY".into());
        assert_eq!(err.to_string(), "missing credential: GEMINI_API_KEY");
    }

    #[test]
    fn collaborator_error_display() {
        let err = CollaboratorError::unavailable("image index", "/data/images.json", "No such file");
        assert_eq!(
            err.to_string(),
            "image index unavailable at /data/images.json: No such file"
        );

        let err = CollaboratorError::Malformed {
            what: "image index",
            reason: "expected an object".into(),
        };
        assert_eq!(err.to_string(), "image index is malformed: expected an object");
    }

    #[test]
    fn tourguide_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: TourGuideError = config_err.into();
        assert!(matches!(err, TourGuideError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn weather_error_display() {
        let err = CollaboratorError::Weather("timeout".into());
        assert_eq!(err.to_string(), "weather service error: timeout");
    }

    #[test]
    fn tourguide_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TourGuideError = io_err.into();
        assert!(matches!(err, TourGuideError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn tourguide_error_ai_display() {
        assert_eq!(
            TourGuideError::Ai("model unavailable".into()).to_string(),
            "ai error: model unavailable"
        );
    }
}
