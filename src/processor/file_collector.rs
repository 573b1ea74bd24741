//! # File Collector Module
//!
//! This module walks the root directory and produces the ordered sequence of
//! candidate files for a pass. Traversal is depth-first with entries sorted
//! by file name, so runs over the same tree report files in the same order.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::file_filter::{ExclusionRules, FilterResult};
use crate::processor::file_io::TEMP_SUFFIX;

/// Identity of a candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  /// Root-relative path, e.g. `./src/main.cpp`. Rules match against this.
  pub path: String,
  /// Extension without the leading dot, e.g. `cpp`. Empty if none.
  pub extension: String,
  /// Root-relative directory, e.g. `./src`, or `.` for the root itself.
  pub directory: String,
  /// Where the file actually lives, used for I/O.
  pub fs_path: PathBuf,
}

impl FileRecord {
  /// Builds a record from a root-relative path string such as
  /// `./src/main.cpp`.
  ///
  /// Returns `None` if the path has no file name.
  pub fn from_relative(path: &str, fs_path: PathBuf) -> Option<Self> {
    let file_name = Path::new(path).file_name()?.to_string_lossy().into_owned();
    let extension = Path::new(&file_name)
      .extension()
      .map(|ext| ext.to_string_lossy().into_owned())
      .unwrap_or_default();
    let directory = match path.rfind('/') {
      Some(0) => "/".to_string(),
      Some(idx) => path[..idx].to_string(),
      None => ".".to_string(),
    };

    Some(Self {
      path: path.to_string(),
      extension,
      directory,
      fs_path,
    })
  }

  /// File name without its extension.
  pub fn stem(&self) -> &str {
    let name = self.path.rsplit('/').next().unwrap_or(&self.path);
    if self.extension.is_empty() {
      name
    } else {
      name.strip_suffix(&format!(".{}", self.extension)).unwrap_or(name)
    }
  }
}

/// File collector for directory traversal.
pub struct FileCollector {
  /// Root of the traversal
  root: PathBuf,
}

impl FileCollector {
  /// Creates a new FileCollector rooted at `root`.
  pub const fn new(root: PathBuf) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Renders a path under the root in `./a/b` form.
  pub fn display_path(&self, path: &Path) -> String {
    let relative = path.strip_prefix(&self.root).unwrap_or(path);
    let mut display = String::from(".");
    for component in relative.components() {
      if let Component::Normal(part) = component {
        display.push('/');
        display.push_str(&part.to_string_lossy());
      }
    }
    display
  }

  /// Decides whether a record takes part in a pass.
  fn should_process(record: &FileRecord, rules: &ExclusionRules, recognized: &dyn Fn(&str) -> bool) -> FilterResult {
    if record.path.ends_with(TEMP_SUFFIX) {
      debug!("Ignoring stale temporary file {}", record.path);
      return FilterResult::skip("Stale temporary file");
    }
    if rules.is_excluded_dir(&record.directory) {
      return FilterResult::skip("Excluded directory");
    }
    if !recognized(&record.extension) {
      return FilterResult::skip("Unrecognized extension");
    }
    FilterResult::process()
  }

  /// Walks the root and collects every regular file that is not under an
  /// excluded directory and whose extension is accepted by `recognized`.
  ///
  /// Unreadable entries are logged and skipped. Symlinks are not followed.
  pub fn collect(&self, rules: &ExclusionRules, recognized: &dyn Fn(&str) -> bool) -> Vec<FileRecord> {
    let start_time = std::time::Instant::now();
    debug!("Scanning directory: {}", self.root.display());

    let walker = WalkDir::new(&self.root)
      .follow_links(false)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| self.keep_entry(entry, rules));

    let mut files = Vec::new();
    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          warn!("Skipping unreadable entry: {e}");
          continue;
        }
      };

      if !entry.file_type().is_file() {
        if entry.file_type().is_symlink() {
          trace!("Skipping: {} (symlink)", entry.path().display());
        }
        continue;
      }

      let rel_path = self.display_path(entry.path());
      let Some(record) = FileRecord::from_relative(&rel_path, entry.path().to_path_buf()) else {
        continue;
      };

      let result = Self::should_process(&record, rules, recognized);
      if result.should_process {
        files.push(record);
      } else {
        trace!("Skipping: {} ({})", record.path, result.reason.unwrap_or("Unknown reason"));
      }
    }

    debug!(
      "Found {} candidate files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    files
  }

  /// Prunes excluded directories so their contents are never visited.
  fn keep_entry(&self, entry: &DirEntry, rules: &ExclusionRules) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
      return true;
    }
    let dir_path = self.display_path(entry.path());
    if rules.is_excluded_dir(&dir_path) {
      trace!("Skipping directory: {dir_path} (excluded)");
      return false;
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, "").expect("write file");
  }

  fn paths(records: &[FileRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
  }

  #[test]
  fn test_record_from_relative() {
    let record = FileRecord::from_relative("./src/kernel/main.cpp", PathBuf::from("x")).expect("record");
    assert_eq!(record.extension, "cpp");
    assert_eq!(record.directory, "./src/kernel");
    assert_eq!(record.stem(), "main");

    let top = FileRecord::from_relative("./boot.s", PathBuf::from("x")).expect("record");
    assert_eq!(top.directory, ".");
    assert_eq!(top.extension, "s");

    let dotfile = FileRecord::from_relative("./.rb", PathBuf::from("x")).expect("record");
    assert_eq!(dotfile.extension, "");
    assert_eq!(dotfile.stem(), ".rb");
  }

  #[test]
  fn test_record_bare_name_has_root_directory() {
    let record = FileRecord::from_relative("widget.cpp", PathBuf::from("widget.cpp")).expect("record");
    assert_eq!(record.directory, ".");
    assert_eq!(record.stem(), "widget");
  }

  #[test]
  fn test_collect_is_sorted_and_filtered() {
    let dir = tempdir().expect("create temp dir");
    touch(dir.path(), "b.cpp");
    touch(dir.path(), "a.h");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "sub/c.lua");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let recognized = |ext: &str| matches!(ext, "cpp" | "h" | "lua");
    let files = collector.collect(&ExclusionRules::default(), &recognized);

    assert_eq!(paths(&files), vec!["./a.h", "./b.cpp", "./sub/c.lua"]);
    assert_eq!(files[2].directory, "./sub");
  }

  #[test]
  fn test_collect_prunes_by_string_prefix() {
    let dir = tempdir().expect("create temp dir");
    touch(dir.path(), "ab/x.c");
    touch(dir.path(), "abc/y.c");
    touch(dir.path(), "a/z.c");
    touch(dir.path(), "ab.c");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let rules = ExclusionRules::new(["./ab"], Vec::<String>::new());
    let files = collector.collect(&rules, &|ext: &str| ext == "c");

    assert_eq!(paths(&files), vec!["./a/z.c", "./ab.c"]);
  }

  #[test]
  fn test_collect_ignores_stale_temporaries() {
    let dir = tempdir().expect("create temp dir");
    touch(dir.path(), "main.cpp");
    touch(dir.path(), "main.cpp.new");
    touch(dir.path(), "main.cpp.a1b2c3.new");

    let collector = FileCollector::new(dir.path().to_path_buf());
    let files = collector.collect(&ExclusionRules::default(), &|_: &str| true);

    assert_eq!(paths(&files), vec!["./main.cpp"]);
  }

  #[test]
  fn test_display_path() {
    let collector = FileCollector::new(PathBuf::from("/work/tree"));
    assert_eq!(collector.display_path(Path::new("/work/tree")), ".");
    assert_eq!(collector.display_path(Path::new("/work/tree/src/a.c")), "./src/a.c");
  }
}
