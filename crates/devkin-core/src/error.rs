/// Errors that can occur across devkin.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use devkin_core::DevkinError;
///
/// let err = DevkinError::Config("number of results must be positive".into());
/// assert!(err.to_string().contains("must be positive"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DevkinError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub API or network failure.
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// Local git operation failure.
    #[error("git error: {0}")]
    Git(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DevkinError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = DevkinError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn github_error_displays_message() {
        let err = DevkinError::GitHub("rate limited".into());
        assert_eq!(err.to_string(), "GitHub error: rate limited");
    }
}
