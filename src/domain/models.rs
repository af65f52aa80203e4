use std::collections::BTreeSet;
use std::path::PathBuf;

/// One dump category: which files go into which output document.
#[derive(Debug, Clone)]
pub struct RunDefinition {
    pub name: String,
    pub output_file: String,
    pub extensions: Vec<String>,
    /// Directory base names pruned for this run only, on top of the global ignore set.
    pub ignore_dirs: Vec<String>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
}

/// Settings shared by every run in one invocation.
#[derive(Debug, Clone)]
pub struct DumpSettings {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub ignore_dirs: BTreeSet<String>,
}

impl DumpSettings {
    pub fn effective_ignore_dirs(&self, run: &RunDefinition) -> BTreeSet<String> {
        let mut ignored = self.ignore_dirs.clone();
        ignored.extend(run.ignore_dirs.iter().cloned());
        ignored
    }

    pub fn output_path(&self, run: &RunDefinition) -> PathBuf {
        self.output_dir.join(&run.output_file)
    }
}

/// A directory reached by the walk together with the regular files it directly contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirVisit {
    pub path: PathBuf,
    /// Root-relative, `/`-separated. Empty for the root itself.
    pub rel_path: String,
    pub depth: usize,
    /// Full paths as listed by the OS, so names that are not valid UTF-8 stay readable.
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpEntry {
    Directory { name: String, level: usize },
    File { name: String, level: usize, path: PathBuf, rel_path: String },
}

/// Everything a run will emit, collected in a single walk so that the
/// structure and contents sections cannot drift apart.
#[derive(Debug, Clone, Default)]
pub struct DumpPlan {
    pub source: String,
    pub entries: Vec<DumpEntry>,
    pub missing: Vec<String>,
}

impl DumpPlan {
    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            DumpEntry::File { path, rel_path, .. } => Some((path, rel_path.as_str())),
            DumpEntry::Directory { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub run_name: String,
    pub output_path: PathBuf,
    pub files_listed: usize,
    pub files_written: usize,
    pub read_errors: usize,
    pub missing_paths: usize,
}
