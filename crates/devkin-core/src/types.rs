use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DevkinError;

/// A single commit as seen by the scoring engine.
///
/// Both commit sources (GitHub API and local git) produce this record; the
/// engine only reads it. The `author` field is the literal identifier used
/// to group commits — typically the commit author email — with no identity
/// resolution applied.
///
/// # Examples
///
/// ```
/// use devkin_core::CommitRecord;
///
/// let record = CommitRecord {
///     author: "alice@example.com".into(),
///     files: vec!["src/main.rs".into(), "Cargo.toml".into()],
/// };
/// assert_eq!(record.files.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Author identifier, typically an email address.
    pub author: String,
    /// Paths of the files touched by this commit.
    pub files: Vec<String>,
}

/// How many of the latest commits to consider.
///
/// The CLI keeps the original `-1` sentinel for "all commits"; anything
/// else must be a positive count. Zero and values below `-1` are rejected
/// before any work starts.
///
/// # Examples
///
/// ```
/// use devkin_core::CommitWindow;
///
/// assert_eq!(CommitWindow::from_raw(100).unwrap(), CommitWindow::Latest(100));
/// assert_eq!(CommitWindow::from_raw(-1).unwrap(), CommitWindow::All);
/// assert!(CommitWindow::from_raw(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitWindow {
    /// The `n` most recent commits.
    Latest(usize),
    /// The entire history.
    All,
}

impl Default for CommitWindow {
    fn default() -> Self {
        CommitWindow::Latest(100)
    }
}

impl CommitWindow {
    /// Interpret a raw window count: positive, or `-1` for all commits.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::Config`] for `0` or anything below `-1`.
    pub fn from_raw(n: i64) -> Result<Self, DevkinError> {
        match n {
            -1 => Ok(CommitWindow::All),
            n if n > 0 => Ok(CommitWindow::Latest(n as usize)),
            other => Err(DevkinError::Config(format!(
                "number of commits must be positive or -1, got {other}"
            ))),
        }
    }

    /// The commit count bound, or `None` for the unbounded window.
    pub fn limit(self) -> Option<usize> {
        match self {
            CommitWindow::Latest(n) => Some(n),
            CommitWindow::All => None,
        }
    }

    /// Returns `true` once `count` commits fill the window.
    ///
    /// # Examples
    ///
    /// ```
    /// use devkin_core::CommitWindow;
    ///
    /// assert!(CommitWindow::Latest(2).is_full(2));
    /// assert!(!CommitWindow::All.is_full(1_000_000));
    /// ```
    pub fn is_full(self, count: usize) -> bool {
        match self.limit() {
            Some(limit) => count >= limit,
            None => false,
        }
    }
}

impl fmt::Display for CommitWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitWindow::Latest(n) => write!(f, "{n}"),
            CommitWindow::All => write!(f, "all"),
        }
    }
}

/// Output format for the report.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use devkin_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable aligned table.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_accepts_positive_counts() {
        assert_eq!(CommitWindow::from_raw(1).unwrap(), CommitWindow::Latest(1));
        assert_eq!(
            CommitWindow::from_raw(500).unwrap(),
            CommitWindow::Latest(500)
        );
    }

    #[test]
    fn window_sentinel_means_all() {
        assert_eq!(CommitWindow::from_raw(-1).unwrap(), CommitWindow::All);
        assert_eq!(CommitWindow::All.limit(), None);
    }

    #[test]
    fn window_rejects_zero_and_below_sentinel() {
        assert!(CommitWindow::from_raw(0).is_err());
        assert!(CommitWindow::from_raw(-2).is_err());
        assert!(CommitWindow::from_raw(i64::MIN).is_err());
    }

    #[test]
    fn window_fill_check() {
        assert!(!CommitWindow::Latest(3).is_full(2));
        assert!(CommitWindow::Latest(3).is_full(3));
        assert!(CommitWindow::Latest(3).is_full(4));
        assert!(!CommitWindow::All.is_full(usize::MAX));
    }

    #[test]
    fn window_default_is_100() {
        assert_eq!(CommitWindow::default(), CommitWindow::Latest(100));
    }

    #[test]
    fn window_display() {
        assert_eq!(CommitWindow::Latest(42).to_string(), "42");
        assert_eq!(CommitWindow::All.to_string(), "all");
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
