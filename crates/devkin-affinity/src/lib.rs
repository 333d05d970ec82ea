//! Contributor similarity scoring.
//!
//! Folds commit records into per-contributor file-change frequency profiles,
//! scores every pair of contributors under a selectable similarity metric,
//! and ranks the top pairs. Pure computation over in-memory data; commit
//! sources live in `devkin-github` and `devkin-git`.

pub mod activity;
pub mod ranking;
pub mod similarity;
