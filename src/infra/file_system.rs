use crate::domain::models::DirVisit;
use log::{debug, warn};
use std::fs;
use std::iter::Peekable;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, FilterEntry, WalkDir};

type PruneFn<'a> = Box<dyn FnMut(&DirEntry) -> bool + 'a>;

/// Root-relative path of `path`, always `/`-separated. Empty for the root.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Depth-first walk yielding each directory with the regular files it
/// directly holds. Files are sorted by name, and so are subdirectories,
/// which are visited after the files of their parent.
pub struct DirWalk<'a> {
    root: PathBuf,
    entries: Peekable<FilterEntry<walkdir::IntoIter, PruneFn<'a>>>,
}

impl<'a> DirWalk<'a> {
    /// `keep_dir(rel_path, name)` is asked for every directory below the root;
    /// returning false prunes it and everything beneath it.
    pub fn new<F>(root: &Path, mut keep_dir: F) -> Self
    where
        F: FnMut(&str, &str) -> bool + 'a,
    {
        let prune_root = root.to_path_buf();
        let prune: PruneFn<'a> = Box::new(move |entry: &DirEntry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            let rel = relative_path(&prune_root, entry.path());
            let keep = keep_dir(&rel, &name);
            if !keep {
                debug!("Pruning directory: {}", rel);
            }
            keep
        });

        let entries = WalkDir::new(root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(prune)
            .peekable();

        Self {
            root: root.to_path_buf(),
            entries,
        }
    }
}

impl Iterator for DirWalk<'_> {
    type Item = DirVisit;

    fn next(&mut self) -> Option<DirVisit> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let depth = entry.depth();
            let mut files = Vec::new();
            loop {
                match self.entries.peek() {
                    Some(Ok(child)) if child.depth() == depth + 1 && !child.file_type().is_dir() => {
                        // Symlinks count only when they resolve to a regular file.
                        if child.path().is_file() {
                            files.push(child.path().to_path_buf());
                        } else {
                            debug!("Skipping non-regular entry: {}", child.path().display());
                        }
                        self.entries.next();
                    }
                    Some(Err(_)) => {
                        if let Some(Err(e)) = self.entries.next() {
                            warn!("Skipping unreadable entry: {}", e);
                        }
                    }
                    _ => break,
                }
            }

            return Some(DirVisit {
                rel_path: relative_path(&self.root, entry.path()),
                path: entry.into_path(),
                depth,
                files,
            });
        }
    }
}

pub fn read_file_contents(path: &Path) -> anyhow::Result<String> {
    debug!("Reading file contents: {}", path.display());
    let contents = fs::read_to_string(path)?;
    debug!("Read {} bytes from file", contents.len());
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(path).unwrap();
        write!(file, "{}", content).unwrap();
    }

    fn file_names(visit: &DirVisit) -> Vec<String> {
        visit
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/project");
        assert_eq!(relative_path(root, Path::new("/project")), "");
        assert_eq!(relative_path(root, &root.join("src").join("main.rs")), "src/main.rs");
    }

    #[test]
    fn test_walk_orders_files_before_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "b.txt", "");
        touch(temp_dir.path(), "a.txt", "");
        touch(temp_dir.path(), "zeta/z.txt", "");
        touch(temp_dir.path(), "alpha/inner/deep.txt", "");
        touch(temp_dir.path(), "alpha/a1.txt", "");

        let visits: Vec<DirVisit> = DirWalk::new(temp_dir.path(), |_, _| true).collect();
        let rels: Vec<&str> = visits.iter().map(|v| v.rel_path.as_str()).collect();

        assert_eq!(rels, vec!["", "alpha", "alpha/inner", "zeta"]);
        assert_eq!(file_names(&visits[0]), vec!["a.txt", "b.txt"]);
        assert_eq!(file_names(&visits[1]), vec!["a1.txt"]);
        assert_eq!(visits[2].depth, 2);
        assert_eq!(file_names(&visits[3]), vec!["z.txt"]);
    }

    #[test]
    fn test_walk_prunes_whole_subtree() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "keep/a.txt", "");
        touch(temp_dir.path(), "skip/b.txt", "");
        touch(temp_dir.path(), "skip/nested/c.txt", "");

        let visits: Vec<DirVisit> =
            DirWalk::new(temp_dir.path(), |_, name| name != "skip").collect();
        let rels: Vec<&str> = visits.iter().map(|v| v.rel_path.as_str()).collect();

        assert_eq!(rels, vec!["", "keep"]);
    }

    #[test]
    fn test_walk_passes_relative_path_to_pruner() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "src/generated/c.txt", "");
        touch(temp_dir.path(), "src/a.txt", "");

        let visits: Vec<DirVisit> =
            DirWalk::new(temp_dir.path(), |rel, _| rel != "src/generated").collect();
        let rels: Vec<&str> = visits.iter().map(|v| v.rel_path.as_str()).collect();

        assert_eq!(rels, vec!["", "src"]);
    }

    #[test]
    fn test_read_file_contents() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "test.txt", "Test content\n");

        let contents = read_file_contents(&temp_dir.path().join("test.txt")).unwrap();
        assert_eq!(contents, "Test content\n");
    }

    #[test]
    fn test_read_nonexistent_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_file_contents(&temp_dir.path().join("nonexistent.txt")).is_err());
    }

    #[test]
    fn test_read_invalid_utf8_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(read_file_contents(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "alpha/a.txt", "a");
        touch(temp_dir.path(), "locked/hidden.txt", "h");
        touch(temp_dir.path(), "zeta/z.txt", "z");
        let locked = temp_dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits; nothing to check then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let visits: Vec<DirVisit> = DirWalk::new(temp_dir.path(), |_, _| true).collect();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let rels: Vec<&str> = visits.iter().map(|v| v.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["", "alpha", "locked", "zeta"]);
        assert!(visits[2].files.is_empty());
        assert_eq!(file_names(&visits[1]), vec!["a.txt"]);
        assert_eq!(file_names(&visits[3]), vec!["z.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_keeps_symlinked_file() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "shared/config.json", "{}");
        std::os::unix::fs::symlink(
            temp_dir.path().join("shared").join("config.json"),
            temp_dir.path().join("linked.json"),
        )
        .unwrap();

        let visits: Vec<DirVisit> = DirWalk::new(temp_dir.path(), |_, _| true).collect();

        assert_eq!(file_names(&visits[0]), vec!["linked.json"]);
        assert_eq!(read_file_contents(&visits[0].files[0]).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_symlinked_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "real/inner.txt", "inner");
        std::os::unix::fs::symlink(
            temp_dir.path().join("real"),
            temp_dir.path().join("mirror"),
        )
        .unwrap();

        let visits: Vec<DirVisit> = DirWalk::new(temp_dir.path(), |_, _| true).collect();
        let rels: Vec<&str> = visits.iter().map(|v| v.rel_path.as_str()).collect();

        assert_eq!(rels, vec!["", "real"]);
        assert!(visits[0].files.is_empty());
        assert_eq!(file_names(&visits[1]), vec!["inner.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_walk_keeps_non_utf8_file_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&path, "readable").unwrap();

        let visits: Vec<DirVisit> = DirWalk::new(temp_dir.path(), |_, _| true).collect();

        assert_eq!(visits[0].files, vec![path]);
        assert_eq!(read_file_contents(&visits[0].files[0]).unwrap(), "readable");
    }
}
