// Copyright (C) Brian G. Milnes 2025

//! File selector: lazy walk of a directory tree yielding candidate files

pub mod selector {
    use crate::config::config::{SelectionPolicy, CACHEDIR_TAG, CARGO_MANIFEST};
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use walkdir::{DirEntry, WalkDir};

    /// Candidate source files under `root`, in file-name order
    ///
    /// Skipped directories are pruned below the root. A build directory name
    /// is pruned only where it holds build output: directly under the root,
    /// next to a `Cargo.toml`, or tagged with `CACHEDIR.TAG`. Elsewhere it is
    /// an ordinary module directory. A traversal error is yielded as an
    /// `Err`; callers treat it as fatal.
    pub fn candidate_files(
        root: &Path,
        policy: &SelectionPolicy,
    ) -> impl Iterator<Item = Result<PathBuf>> {
        let prune = policy.clone();
        let select = policy.clone();
        let root_display = root.display().to_string();

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !is_skipped_dir(entry, &prune))
            .filter_map(move |entry| match entry {
                Ok(entry) => is_candidate(&entry, &select).then(|| Ok(entry.into_path())),
                Err(e) => Some(Err(anyhow::Error::new(e).context(format!("failed to walk {root_display}")))),
            })
    }

    fn is_skipped_dir(entry: &DirEntry, policy: &SelectionPolicy) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        policy.skips_dir(&name) || (policy.is_build_dir_name(&name) && is_build_output(entry))
    }

    fn is_build_output(entry: &DirEntry) -> bool {
        let dir = entry.path();
        entry.depth() == 1
            || dir.join(CACHEDIR_TAG).is_file()
            || dir.parent().is_some_and(|parent| parent.join(CARGO_MANIFEST).is_file())
    }

    fn is_candidate(entry: &DirEntry, policy: &SelectionPolicy) -> bool {
        entry.file_type().is_file() && policy.accepts_file_name(&entry.file_name().to_string_lossy())
    }
}
