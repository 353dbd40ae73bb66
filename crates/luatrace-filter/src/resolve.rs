//! File resolution seam between the filter and its host.
//!
//! Traceback paths are whatever the interpreter printed: relative to some
//! unknown working directory, truncated, or bare basenames. Mapping them to
//! an openable file is the host's call; the filter only needs a yes/no
//! answer with the concrete path.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Maps a reported path to a concrete source file. `None` discards the
/// candidate match entirely; the filter never produces a partial link.
pub trait FileResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Option<PathBuf>;
}

/// Resolves against a project tree on disk.
///
/// Exact lookup relative to the root wins; otherwise the tree is walked
/// and the first file whose trailing path components equal the requested
/// ones is returned. Hidden directories are not descended into.
#[derive(Debug, Clone)]
pub struct WorkspaceResolver {
    root: PathBuf,
}

impl WorkspaceResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileResolver for WorkspaceResolver {
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return None;
        }

        let candidate = self.root.join(trimmed);
        if candidate.is_file() {
            return Some(candidate);
        }

        let wanted: Vec<&str> = trimmed
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();
        if wanted.is_empty() {
            return None;
        }
        find_by_suffix(&self.root, &wanted)
    }
}

fn find_by_suffix(dir: &Path, wanted: &[&str]) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();

    for entry in entries.flatten() {
        let entry_path = entry.path();
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with('.')
        {
            continue;
        }
        if entry_path.is_dir() {
            subdirs.push(entry_path);
        } else if ends_with_components(&entry_path, wanted) {
            return Some(entry_path);
        }
    }

    for sub in subdirs {
        if let Some(found) = find_by_suffix(&sub, wanted) {
            return Some(found);
        }
    }
    None
}

fn ends_with_components(path: &Path, wanted: &[&str]) -> bool {
    let components: Vec<&str> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if components.len() < wanted.len() {
        return false;
    }
    components[components.len() - wanted.len()..] == *wanted
}

/// In-memory table for tests and embedders that already know their files.
#[derive(Debug, Default)]
pub struct StaticResolver {
    entries: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reported: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        self.entries.insert(reported.into(), file.into());
        self
    }
}

impl FileResolver for StaticResolver {
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.entries.get(path).cloned()
    }
}

/// Resolves nothing; turns the filter into a diff-only scanner.
#[derive(Debug, Default)]
pub struct NullResolver;

impl FileResolver for NullResolver {
    fn resolve(&self, _path: &str) -> Option<PathBuf> {
        None
    }
}
