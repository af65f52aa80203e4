use std::collections::BTreeSet;

pub fn matches_extension(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
}

pub fn is_ignored_dir(dir_name: &str, ignored: &BTreeSet<String>) -> bool {
    ignored.contains(dir_name)
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.replace('\\', "/").trim_matches('/').to_string()
}

/// True when `rel_path` is `prefix` itself or lies beneath it, compared
/// segment by segment so that `src` does not match `srcOld`.
pub fn path_has_prefix(rel_path: &str, prefix: &str) -> bool {
    let prefix = normalize_prefix(prefix);
    if prefix.is_empty() {
        return true;
    }
    match rel_path.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// True when `rel_path` is a strict ancestor of `prefix`, i.e. descending
/// through it is needed to reach the prefix.
pub fn is_ancestor_of(rel_path: &str, prefix: &str) -> bool {
    let prefix = normalize_prefix(prefix);
    if rel_path.is_empty() {
        return !prefix.is_empty();
    }
    match prefix.strip_prefix(rel_path) {
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Include/exclude gating on root-relative directory paths.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: include.iter().map(|p| normalize_prefix(p)).collect(),
            exclude: exclude.iter().map(|p| normalize_prefix(p)).collect(),
        }
    }

    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.iter().any(|p| path_has_prefix(rel_path, p))
    }

    pub fn is_included(&self, rel_path: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|p| path_has_prefix(rel_path, p))
    }

    /// Whether the walk should enter this directory at all.
    pub fn should_descend(&self, rel_path: &str) -> bool {
        if self.is_excluded(rel_path) {
            return false;
        }
        self.is_included(rel_path) || self.include.iter().any(|p| is_ancestor_of(rel_path, p))
    }

    /// Whether files directly inside this directory are collected. Ancestors
    /// of an include prefix are traversed but contribute no files.
    pub fn collects_files(&self, rel_path: &str) -> bool {
        !self.is_excluded(rel_path) && self.is_included(rel_path)
    }

    pub fn include_paths(&self) -> &[String] {
        &self.include
    }
}
