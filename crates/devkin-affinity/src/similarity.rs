//! Similarity metrics over file-change frequency profiles.
//!
//! Three interchangeable metrics, all summing over the files both
//! contributors touched; files touched by only one contributor never
//! contribute to the score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::activity::FileFrequencyMap;

/// A similarity metric between two contributors' activity profiles.
///
/// The set of metrics is closed; each variant holds its scoring rule.
/// Selectable by name (case-insensitive), defaulting to [`Harmonic`].
///
/// [`Harmonic`]: Similarity::Harmonic
///
/// # Examples
///
/// ```
/// use devkin_affinity::similarity::Similarity;
///
/// let f: Similarity = "GEOMETRIC".parse().unwrap();
/// assert_eq!(f, Similarity::Geometric);
/// assert_eq!(Similarity::default(), Similarity::Harmonic);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    /// Sum of `min(freq1, freq2)` over shared files: total co-occurring
    /// edits, capped per file by the less active contributor.
    Intersection,
    /// Sum of `sqrt(freq1 * freq2)` over shared files: geometric-mean
    /// weighted overlap.
    Geometric,
    /// Sum of `2 * freq1 * freq2 / (freq1 + freq2)` over shared files:
    /// harmonic-mean weighted overlap, the most balance-sensitive metric.
    #[default]
    Harmonic,
}

impl Similarity {
    /// Score two activity profiles.
    ///
    /// Symmetric in its arguments and always non-negative. The walk is
    /// driven from the smaller map, so each call is
    /// `O(min(|first|, |second|))`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use devkin_affinity::similarity::Similarity;
    ///
    /// let a = HashMap::from([("x.txt".to_string(), 3), ("y.txt".to_string(), 1)]);
    /// let b = HashMap::from([("x.txt".to_string(), 2), ("z.txt".to_string(), 5)]);
    ///
    /// assert_eq!(Similarity::Intersection.score(&a, &b), 2.0);
    /// assert!((Similarity::Harmonic.score(&a, &b) - 2.4).abs() < 1e-9);
    /// ```
    pub fn score(self, first: &FileFrequencyMap, second: &FileFrequencyMap) -> f64 {
        let (small, large) = if first.len() <= second.len() {
            (first, second)
        } else {
            (second, first)
        };

        small
            .iter()
            .filter_map(|(path, &f1)| {
                large.get(path).map(|&f2| (f64::from(f1), f64::from(f2)))
            })
            .map(|(f1, f2)| match self {
                Similarity::Intersection => f1.min(f2),
                Similarity::Geometric => (f1 * f2).sqrt(),
                Similarity::Harmonic => {
                    // Unreachable through the intersection set, but the
                    // division must stay guarded.
                    if f1 + f2 == 0.0 {
                        0.0
                    } else {
                        2.0 * f1 * f2 / (f1 + f2)
                    }
                }
            })
            .sum()
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Similarity::Intersection => write!(f, "intersection"),
            Similarity::Geometric => write!(f, "geometric"),
            Similarity::Harmonic => write!(f, "harmonic"),
        }
    }
}

impl FromStr for Similarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intersection" => Ok(Similarity::Intersection),
            "geometric" => Ok(Similarity::Geometric),
            "harmonic" => Ok(Similarity::Harmonic),
            other => Err(format!("unknown similarity function: {other}")),
        }
    }
}
