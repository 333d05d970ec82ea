use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DevkinError;
use crate::types::CommitWindow;

/// Top-level configuration loaded from `.devkin.toml`.
///
/// Resolution order: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use devkin_core::DevkinConfig;
///
/// let config = DevkinConfig::default();
/// assert_eq!(config.analysis.results, 5);
/// assert_eq!(config.analysis.commits, 100);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevkinConfig {
    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// GitHub access settings.
    #[serde(default)]
    pub github: GithubConfig,
}

impl DevkinConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::Io`] if the file cannot be read, or
    /// [`DevkinError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use devkin_core::DevkinConfig;
    /// use std::path::Path;
    ///
    /// let config = DevkinConfig::from_file(Path::new(".devkin.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, DevkinError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use devkin_core::DevkinConfig;
    ///
    /// let toml = r#"
    /// [analysis]
    /// results = 10
    /// "#;
    /// let config = DevkinConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.analysis.results, 10);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DevkinError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Reject out-of-range values before any computation starts.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::Config`] if `results` is not positive or the
    /// commit window is neither positive nor the `-1` sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use devkin_core::DevkinConfig;
    ///
    /// let mut config = DevkinConfig::default();
    /// config.analysis.results = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), DevkinError> {
        if self.analysis.results <= 0 {
            return Err(DevkinError::Config(format!(
                "number of results must be positive, got {}",
                self.analysis.results
            )));
        }
        CommitWindow::from_raw(self.analysis.commits)?;
        Ok(())
    }
}

/// Analysis settings: similarity function, result count, commit window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Similarity function name (default: `"harmonic"`).
    #[serde(default = "default_function")]
    pub function: String,
    /// Number of pairs to report (default: 5).
    #[serde(default = "default_results")]
    pub results: i64,
    /// Commit window: positive count or -1 for all (default: 100).
    #[serde(default = "default_commits")]
    pub commits: i64,
}

fn default_function() -> String {
    "harmonic".into()
}

fn default_results() -> i64 {
    5
}

fn default_commits() -> i64 {
    100
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            function: default_function(),
            results: default_results(),
            commits: default_commits(),
        }
    }
}

/// GitHub access settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token; falls back to `GITHUB_TOKEN` / `GH_TOKEN`.
    pub token: Option<String>,
}
