//! Local git commit source.
//!
//! Walks the history of an on-disk repository via git2 and produces the
//! same commit records the GitHub source does, so a clone can be analyzed
//! without any network access.

use std::path::Path;

use git2::{Delta, DiffFindOptions, Repository, Sort};

use devkin_core::{CommitRecord, CommitWindow, DevkinError};

/// Mine commit records from a local repository, newest first.
///
/// Walks from HEAD sorted by commit time and stops once `window` is
/// satisfied. Each commit is diffed against its first parent to collect
/// the touched file paths (rename detection on; deleted files are recorded
/// under their old path). The author identifier is the commit author
/// email, `"unknown"` when absent.
///
/// # Errors
///
/// Returns [`DevkinError::Git`] if the repository cannot be opened or
/// walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use devkin_core::CommitWindow;
/// use devkin_git::mine_commits;
///
/// let commits = mine_commits(Path::new("."), CommitWindow::Latest(100)).unwrap();
/// for c in &commits {
///     println!("{}: {} files", c.author, c.files.len());
/// }
/// ```
pub fn mine_commits(
    repo_path: &Path,
    window: CommitWindow,
) -> Result<Vec<CommitRecord>, DevkinError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| DevkinError::Git(format!("failed to open repository: {e}")))?;

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| DevkinError::Git(format!("failed to create revwalk: {e}")))?;
    revwalk.set_sorting(Sort::TIME).ok();
    revwalk
        .push_head()
        .map_err(|e| DevkinError::Git(format!("failed to push HEAD: {e}")))?;

    let mut commits = Vec::new();
    for oid_result in revwalk {
        if window.is_full(commits.len()) {
            break;
        }

        let oid = oid_result.map_err(|e| DevkinError::Git(format!("revwalk error: {e}")))?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| DevkinError::Git(format!("failed to find commit: {e}")))?;

        let files = touched_paths(&repo, &commit)?;
        let author = commit.author();

        commits.push(CommitRecord {
            author: author.email().unwrap_or("unknown").to_string(),
            files,
        });
    }

    Ok(commits)
}

/// File paths touched by a commit, from the diff against its first parent.
fn touched_paths(repo: &Repository, commit: &git2::Commit) -> Result<Vec<String>, DevkinError> {
    let tree = commit
        .tree()
        .map_err(|e| DevkinError::Git(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| DevkinError::Git(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| DevkinError::Git(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
        .map_err(|e| DevkinError::Git(format!("failed to compute diff: {e}")))?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| DevkinError::Git(format!("failed to find renames: {e}")))?;

    let mut paths = Vec::new();
    for delta in diff.deltas() {
        let file = if delta.status() == Delta::Deleted {
            delta.old_file()
        } else {
            delta.new_file()
        };
        let path = file
            .path()
            .unwrap_or(Path::new(""))
            .to_string_lossy()
            .to_string();
        if !path.is_empty() {
            paths.push(path);
        }
    }

    Ok(paths)
}
