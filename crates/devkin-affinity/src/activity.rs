//! Per-contributor activity extraction.
//!
//! Folds a window of commits into a table mapping each contributor to the
//! files they touched and how often.

use std::collections::HashMap;

use devkin_core::CommitRecord;

/// How many times a contributor touched each file path.
///
/// A path absent from the map is equivalent to count 0; materialized counts
/// are always >= 1.
pub type FileFrequencyMap = HashMap<String, u32>;

/// Per-contributor activity table, keyed by the contributor identifier.
pub type ContributorActivity = HashMap<String, FileFrequencyMap>;

/// Fold commits into a contributor activity table.
///
/// The fold is commutative and associative over counts, so the order of the
/// input does not affect the result; the caller is responsible for having
/// truncated the source to the desired window. An empty input yields an
/// empty table.
///
/// # Examples
///
/// ```
/// use devkin_core::CommitRecord;
/// use devkin_affinity::activity::build_activity;
///
/// let commits = vec![
///     CommitRecord {
///         author: "alice@example.com".into(),
///         files: vec!["a.rs".into(), "b.rs".into()],
///     },
///     CommitRecord {
///         author: "alice@example.com".into(),
///         files: vec!["a.rs".into()],
///     },
/// ];
/// let activity = build_activity(&commits);
/// assert_eq!(activity["alice@example.com"]["a.rs"], 2);
/// assert_eq!(activity["alice@example.com"]["b.rs"], 1);
/// ```
pub fn build_activity(commits: &[CommitRecord]) -> ContributorActivity {
    let mut activity: ContributorActivity = HashMap::new();

    for commit in commits {
        let files = activity.entry(commit.author.clone()).or_default();
        for path in &commit.files {
            *files.entry(path.clone()).or_default() += 1;
        }
    }

    activity
}

/// Merge one activity table into another.
///
/// Union of contributor keys; per-file counts are summed for contributors
/// appearing in both. Folding partitions of a commit sequence and merging
/// the partial tables is equivalent to folding the whole sequence.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use devkin_affinity::activity::{merge_activity, ContributorActivity};
///
/// let mut base: ContributorActivity =
///     HashMap::from([("a@x".to_string(), HashMap::from([("f".to_string(), 1)]))]);
/// let other: ContributorActivity =
///     HashMap::from([("a@x".to_string(), HashMap::from([("f".to_string(), 2)]))]);
/// merge_activity(&mut base, other);
/// assert_eq!(base["a@x"]["f"], 3);
/// ```
pub fn merge_activity(base: &mut ContributorActivity, other: ContributorActivity) {
    for (author, files) in other {
        let entry = base.entry(author).or_default();
        for (path, count) in files {
            *entry.entry(path).or_default() += count;
        }
    }
}
