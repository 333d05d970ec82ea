//! Pairwise ranking of contributors by similarity.
//!
//! Enumerates every unordered pair of contributors exactly once, scores each
//! pair under the chosen metric, and keeps the top K by descending score.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use devkin_core::CommitRecord;

use crate::activity::{build_activity, ContributorActivity, FileFrequencyMap};
use crate::similarity::Similarity;

/// A scored pair of contributors.
///
/// Canonical form: `first` is the lexicographically smaller identifier, so
/// (A, B) and (B, A) are the same entity and each pair appears at most once.
///
/// # Examples
///
/// ```
/// use devkin_affinity::ranking::ScoredPair;
///
/// let pair = ScoredPair {
///     first: "alice@example.com".into(),
///     second: "bob@example.com".into(),
///     score: 2.4,
/// };
/// assert!(pair.first < pair.second);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPair {
    /// Lexicographically smaller contributor identifier.
    pub first: String,
    /// Second contributor identifier.
    pub second: String,
    /// Non-negative similarity score.
    pub score: f64,
}

/// Score every unordered pair of contributors and keep the top `k`.
///
/// Pairs are sorted by score descending; equal scores fall back to
/// lexicographic order of the canonical pair, so repeated runs on identical
/// input produce identical output. Fewer than 2 contributors yield an empty
/// ranking; a `k` larger than the number of pairs returns all pairs.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use devkin_affinity::ranking::rank_pairs;
/// use devkin_affinity::similarity::Similarity;
///
/// let activity = HashMap::from([
///     ("alice@e.com".to_string(), HashMap::from([("a.rs".to_string(), 2)])),
///     ("bob@e.com".to_string(), HashMap::from([("a.rs".to_string(), 1)])),
/// ]);
/// let pairs = rank_pairs(&activity, Similarity::Intersection, 5);
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].score, 1.0);
/// ```
pub fn rank_pairs(
    activity: &ContributorActivity,
    function: Similarity,
    k: usize,
) -> Vec<ScoredPair> {
    let mut contributors: Vec<&String> = activity.keys().collect();
    contributors.sort();

    let empty = FileFrequencyMap::new();
    let profile = |id: &String| activity.get(id).unwrap_or(&empty);

    let mut pairs = Vec::new();
    for i in 0..contributors.len() {
        for j in (i + 1)..contributors.len() {
            let first = contributors[i];
            let second = contributors[j];
            pairs.push(ScoredPair {
                first: first.clone(),
                second: second.clone(),
                score: function.score(profile(first), profile(second)),
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.first.cmp(&b.first))
            .then_with(|| a.second.cmp(&b.second))
    });
    pairs.truncate(k);
    pairs
}

/// Complete affinity analysis for a window of commits.
///
/// # Examples
///
/// ```
/// use devkin_core::CommitRecord;
/// use devkin_affinity::ranking::analyze;
/// use devkin_affinity::similarity::Similarity;
///
/// let commits = vec![CommitRecord {
///     author: "alice@example.com".into(),
///     files: vec!["a.rs".into()],
/// }];
/// let report = analyze(&commits, Similarity::Harmonic, 5);
/// assert_eq!(report.contributors, 1);
/// assert!(report.pairs.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffinityReport {
    /// Number of commits folded into the activity table.
    pub commits_analyzed: usize,
    /// Number of distinct contributors seen.
    pub contributors: usize,
    /// Metric the pairs were scored under.
    pub function: Similarity,
    /// Top pairs, score descending.
    pub pairs: Vec<ScoredPair>,
}

impl AffinityReport {
    /// `true` when no pair could be formed (fewer than 2 contributors).
    ///
    /// The ranking is empty in that case rather than an error; callers
    /// decide how to present it.
    pub fn is_insufficient(&self) -> bool {
        self.contributors < 2
    }

    /// Render as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Contributor Affinity\n\n");
        out.push_str(&format!("**Commits analyzed:** {}\n", self.commits_analyzed));
        out.push_str(&format!("**Contributors:** {}\n", self.contributors));
        out.push_str(&format!("**Function:** {}\n\n", self.function));

        if self.pairs.is_empty() {
            out.push_str("No contributor pairs to report.\n");
            return out;
        }

        out.push_str("| Rank | Contributor | Contributor | Score |\n");
        out.push_str("|------|-------------|-------------|-------|\n");
        for (i, pair) in self.pairs.iter().enumerate() {
            out.push_str(&format!(
                "| {} | `{}` | `{}` | {:.4} |\n",
                i + 1,
                pair.first,
                pair.second,
                pair.score,
            ));
        }
        out
    }
}

impl fmt::Display for AffinityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs.is_empty() {
            return writeln!(f, "No contributor pairs to report.");
        }

        // Align columns to the longest identifier on each side.
        let w1 = self.pairs.iter().map(|p| p.first.len()).max().unwrap_or(0);
        let w2 = self.pairs.iter().map(|p| p.second.len()).max().unwrap_or(0);

        for pair in &self.pairs {
            writeln!(
                f,
                "{:<w1$} | {:<w2$} | {:.6}",
                pair.first, pair.second, pair.score,
            )?;
        }
        Ok(())
    }
}

/// Build the activity table for `commits` and rank all contributor pairs.
pub fn analyze(commits: &[CommitRecord], function: Similarity, k: usize) -> AffinityReport {
    let activity = build_activity(commits);
    let pairs = rank_pairs(&activity, function, k);
    AffinityReport {
        commits_analyzed: commits.len(),
        contributors: activity.len(),
        function,
        pairs,
    }
}
