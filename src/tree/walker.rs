//! DirectoryWalker - writes one index page per visited directory

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;

use crate::entry::{Description, EntryDescriber, link_segment};
use crate::error::{Error, Result};
use crate::output::{PageContext, PageRenderer, Reporter};

use super::config::IndexConfig;
use super::utils::{compile_pattern, file_name_string};

/// Counts collected over one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Index pages written
    pub directories: usize,
    /// Entries that made it onto a page
    pub entries: usize,
    /// Entries left out because they could not be used
    pub skipped: usize,
}

/// A child that survived pattern and hidden filtering.
#[derive(Debug)]
struct Candidate {
    name: String,
    path: PathBuf,
    is_dir: bool,
    is_file: bool,
}

/// Depth-first walker that renders and writes index pages.
///
/// Symbolic links to directories are followed when recursing and nothing
/// guards against link cycles.
pub struct DirectoryWalker {
    config: IndexConfig,
    pattern: Pattern,
    renderer: PageRenderer,
}

impl DirectoryWalker {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let pattern = compile_pattern(config.pattern())?;
        Ok(Self {
            config,
            pattern,
            renderer: PageRenderer::new(),
        })
    }

    /// Index `root` and, if configured, everything below it.
    pub fn walk<R: Reporter + ?Sized>(&self, root: &Path, reporter: &mut R) -> Result<WalkSummary> {
        let mut summary = WalkSummary::default();
        self.walk_dir(root, 0, reporter, &mut summary)?;
        debug!(?summary, root = %root.display(), "walk finished");
        Ok(summary)
    }

    fn walk_dir<R: Reporter + ?Sized>(
        &self,
        dir: &Path,
        level: usize,
        reporter: &mut R,
        summary: &mut WalkSummary,
    ) -> Result<()> {
        let name = file_name_string(dir);
        if name.as_deref().is_some_and(|n| self.config.hides(n)) {
            debug!(dir = %dir.display(), "skipping hidden directory");
            return Ok(());
        }

        if level == 0 {
            let abs = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
            reporter.walk_started(&abs)?;
        } else {
            let display = name.unwrap_or_else(|| dir.display().to_string());
            reporter.directory_entered(&display, level)?;
        }

        let candidates = self.enumerate(dir)?;

        let describer = EntryDescriber::new(&self.config);
        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            match describer.describe(&candidate.path, reporter)? {
                Description::Listed(entry) => entries.push(entry),
                Description::Excluded => {}
                Description::Skipped => summary.skipped += 1,
            }
        }
        summary.entries += entries.len();

        let context = PageContext {
            entries,
            path_top_dir: dir.display().to_string(),
            index_name: link_segment(&self.config.index_name()),
            is_root: level == 0,
        };
        let html = self.renderer.render(&context)?;
        self.write_index(dir, &html)?;
        summary.directories += 1;

        if self.config.recursive {
            for candidate in candidates.iter().filter(|c| c.is_dir) {
                self.walk_dir(&candidate.path, level + 1, reporter, summary)?;
            }
        }

        Ok(())
    }

    /// Children of `dir` matching the pattern, minus hidden names, with
    /// everything but regular files first and each group ordered by name.
    fn enumerate(&self, dir: &Path) -> Result<Vec<Candidate>> {
        let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

        let mut candidates = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.pattern.matches(&name) || self.config.hides(&name) {
                continue;
            }
            let path = entry.path();
            // Both follow symlinks, so links to directories sort and recurse as
            // directories
            let is_dir = path.is_dir();
            let is_file = path.is_file();
            candidates.push(Candidate {
                name,
                path,
                is_dir,
                is_file,
            });
        }

        sort_candidates(&mut candidates);
        Ok(candidates)
    }

    fn write_index(&self, dir: &Path, html: &str) -> Result<()> {
        let index_path = dir.join(&self.config.output_file);
        let mut file = File::create(&index_path).map_err(|e| Error::io(&index_path, e))?;
        write_page(&mut file, html, &index_path)
    }
}

/// Regular files go last. Directories, and anything else that is not a
/// regular file such as a dangling link or a FIFO, come first.
fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.is_file.cmp(&b.is_file).then_with(|| a.name.cmp(&b.name)));
}

/// Write a rendered page to `out`, failing unless every byte made it.
/// `path` only names the destination in errors and logs.
fn write_page<W: Write>(out: &mut W, html: &str, path: &Path) -> Result<()> {
    let bytes = html.as_bytes();
    let written = write_counted(out, bytes).map_err(|e| Error::io(path, e))?;
    if written != bytes.len() {
        return Err(Error::IncompleteWrite {
            written,
            expected: bytes.len(),
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), bytes = written, "index written");
    Ok(())
}

/// Write as much of `buf` as the writer accepts, returning the byte count.
/// Stops early when the writer reports it can take no more.
fn write_counted<W: Write>(out: &mut W, buf: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < buf.len() {
        match out.write(&buf[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingReporter, TestDir};

    fn walk(dir: &TestDir, config: IndexConfig) -> (WalkSummary, RecordingReporter) {
        let mut reporter = RecordingReporter::default();
        let summary = DirectoryWalker::new(config)
            .unwrap()
            .walk(dir.path(), &mut reporter)
            .unwrap();
        (summary, reporter)
    }

    fn candidate(name: &str, is_dir: bool, is_file: bool) -> Candidate {
        Candidate {
            name: name.to_string(),
            path: PathBuf::from(name),
            is_dir,
            is_file,
        }
    }

    /// Writer that accepts a fixed number of bytes, then reports it is full.
    struct LimitedWriter {
        remaining: usize,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.remaining).min(3);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sort_directories_first_then_by_name() {
        let mut candidates = vec![
            candidate("b.txt", false, true),
            candidate("Zeta", true, false),
            candidate("a.txt", false, true),
            candidate("alpha", true, false),
            candidate("B.txt", false, true),
        ];
        sort_candidates(&mut candidates);
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "alpha", "B.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_sort_non_regular_entries_with_directories() {
        let mut candidates = vec![
            candidate("a.txt", false, true),
            candidate("pipe", false, false),
            candidate("docs", true, false),
            candidate("broken", false, false),
        ];
        sort_candidates(&mut candidates);
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["broken", "docs", "pipe", "a.txt"]);
    }

    #[test]
    fn test_write_page_short_write_is_fatal() {
        let path = Path::new("/srv/site/index.html");
        let mut limited = LimitedWriter { remaining: 7 };

        let err = write_page(&mut limited, "0123456789", path).unwrap_err();
        assert!(
            matches!(err, Error::IncompleteWrite { written: 7, expected: 10, .. }),
            "got {:?}",
            err
        );
        let message = err.to_string();
        assert!(message.contains("only 7 of 10 bytes"), "got: {}", message);
        assert!(message.contains("/srv/site/index.html"), "got: {}", message);

        let mut out = Vec::new();
        write_page(&mut out, "<html></html>", path).unwrap();
        assert_eq!(out, b"<html></html>");
    }

    #[test]
    fn test_walk_marks_only_top_page_as_root() {
        let dir = TestDir::new();
        dir.add_file("sub/a.txt", "a");

        let config = IndexConfig {
            recursive: true,
            ..Default::default()
        };
        walk(&dir, config);
        assert!(!dir.read("index.html").contains("Parent directory"));
        assert!(dir.read("sub/index.html").contains("Parent directory"));
    }

    #[test]
    fn test_write_counted_full_and_short() {
        let mut out = Vec::new();
        assert_eq!(write_counted(&mut out, b"hello").unwrap(), 5);
        assert_eq!(out, b"hello");

        let mut limited = LimitedWriter { remaining: 7 };
        assert_eq!(write_counted(&mut limited, b"0123456789").unwrap(), 7);
    }

    #[test]
    fn test_walk_writes_single_index_without_recursion() {
        let dir = TestDir::new();
        dir.add_file("a.txt", "a");
        dir.add_file("sub/b.txt", "b");

        let (summary, reporter) = walk(&dir, IndexConfig::default());
        assert_eq!(summary.directories, 1);
        assert_eq!(summary.entries, 2);
        assert!(dir.path().join("index.html").exists());
        assert!(!dir.path().join("sub/index.html").exists());
        assert_eq!(reporter.lines[0], "Traversing directories:");
        assert_eq!(reporter.lines.len(), 2);
    }

    #[test]
    fn test_walk_recursive_reports_tree() {
        let dir = TestDir::new();
        dir.add_file("one/two/deep.txt", "x");
        dir.add_file("other/file.txt", "y");

        let config = IndexConfig {
            recursive: true,
            ..Default::default()
        };
        let (summary, reporter) = walk(&dir, config);
        assert_eq!(summary.directories, 4);
        assert_eq!(
            &reporter.lines[2..],
            &["  \u{221f} one", "    \u{221f} two", "  \u{221f} other"]
        );
        for sub in ["one", "one/two", "other"] {
            assert!(dir.path().join(sub).join("index.html").exists(), "missing index in {}", sub);
        }
    }

    #[test]
    fn test_walk_skips_hidden_root() {
        let dir = TestDir::new();
        dir.add_file(".hidden/file.txt", "x");
        let root = dir.path().join(".hidden");

        let mut reporter = RecordingReporter::default();
        let summary = DirectoryWalker::new(IndexConfig::default())
            .unwrap()
            .walk(&root, &mut reporter)
            .unwrap();
        assert_eq!(summary, WalkSummary::default());
        assert!(reporter.lines.is_empty());
        assert!(!root.join("index.html").exists());
    }

    #[test]
    fn test_walk_filter_replaces_default_pattern() {
        let dir = TestDir::new();
        dir.add_file("keep.py", "");
        dir.add_file("drop.rs", "");
        dir.add_file(".secret.py", "");

        let config = IndexConfig {
            filter: Some("*.py".to_string()),
            ..Default::default()
        };
        let (summary, _) = walk(&dir, config);
        assert_eq!(summary.entries, 1);
        let html = dir.read("index.html");
        assert!(html.contains("keep.py"));
        assert!(!html.contains("drop.rs"));
        assert!(!html.contains(".secret.py"));
    }

    #[test]
    fn test_walk_missing_root_is_fatal() {
        let dir = TestDir::new();
        let mut reporter = RecordingReporter::default();
        let err = DirectoryWalker::new(IndexConfig::default())
            .unwrap()
            .walk(&dir.path().join("nope"), &mut reporter)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let config = IndexConfig {
            filter: Some("[".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            DirectoryWalker::new(config),
            Err(Error::Pattern { .. })
        ));
    }
}
