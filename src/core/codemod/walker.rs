//! Candidate file discovery.

use crate::defaults::CodemodConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories to skip at any depth (dependency/VCS directories).
const ALWAYS_SKIP_DIRS: &[&str] = &[".git", ".hg", ".svn", "vendor", "node_modules"];

type EntryFilter = fn(&DirEntry) -> bool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Path relative to the root it was found under, `/`-separated.
    pub relative: String,
}

impl Candidate {
    pub fn display(&self) -> String {
        self.path.to_string_lossy().replace('\\', "/")
    }
}

/// A directory entry the walk could not read.
#[derive(Debug, Clone, Serialize)]
pub struct WalkFailure {
    pub path: String,
    pub message: String,
}

/// Walks one or more validated roots. Call [`FileWalker::candidates`] again to
/// restart from scratch.
#[derive(Debug, Clone)]
pub struct FileWalker {
    roots: Vec<PathBuf>,
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl FileWalker {
    /// Validate roots up front: an unusable root fails the whole run.
    pub fn new(roots: &[String], config: &CodemodConfig) -> Result<Self> {
        if roots.is_empty() {
            return Err(Error::validation_invalid_argument(
                "roots",
                "At least one root directory is required",
            ));
        }

        let mut resolved = Vec::with_capacity(roots.len());
        for raw in roots {
            let root = PathBuf::from(shellexpand::tilde(raw).to_string());
            if !root.is_dir() {
                return Err(Error::walk_root_invalid(raw, "not an existing directory"));
            }
            fs::read_dir(&root).map_err(|e| Error::walk_root_invalid(raw, e.to_string()))?;
            resolved.push(root);
        }

        Ok(Self {
            roots: resolved,
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            exclude: config.exclude.clone(),
        })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            walker: self,
            next_root: 0,
            current: None,
            seen: HashSet::new(),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|want| want == ext))
            .unwrap_or(false)
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, relative))
    }
}

fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    !ALWAYS_SKIP_DIRS.contains(&name.as_ref())
}

/// Lazy candidate iterator. Never yields the same file twice, even when
/// roots overlap.
pub struct Candidates<'a> {
    walker: &'a FileWalker,
    next_root: usize,
    current: Option<(&'a Path, walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>)>,
    seen: HashSet<PathBuf>,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = std::result::Result<Candidate, WalkFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let root = self.walker.roots.get(self.next_root)?;
                self.next_root += 1;
                let iter = WalkDir::new(root)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(keep_entry as EntryFilter);
                self.current = Some((root.as_path(), iter));
            }

            let (root, iter) = self.current.as_mut()?;
            let root: &'a Path = *root;

            let entry = match iter.next() {
                None => {
                    self.current = None;
                    continue;
                }
                Some(Err(e)) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    return Some(Err(WalkFailure {
                        path,
                        message: e.to_string(),
                    }));
                }
                Some(Ok(entry)) => entry,
            };

            if !entry.file_type().is_file() || !self.walker.matches_extension(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            if self.walker.is_excluded(&relative) {
                continue;
            }

            let key = fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if !self.seen.insert(key) {
                continue;
            }

            return Some(Ok(Candidate {
                path: entry.into_path(),
                relative,
            }));
        }
    }
}
