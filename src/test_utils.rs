//! Test utilities for building directory trees and capturing reporter output.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::entry::EntryKind;
use crate::output::{
    ERROR_PREFIX, Reporter, WARNING_PREFIX, branch_line, not_writable_message, symlink_line,
    unreadable_message,
};

/// A temporary directory tree for testing.
///
/// The directory name never starts with a dot, so walking it is not
/// mistaken for walking a hidden directory. Cleaned up when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("dirindex-test-")
            .tempdir()
            .expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory (and its parents).
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Read a file below the directory as a string.
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Reporter that keeps every line it would have printed, without colors.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn walk_started(&mut self, root: &Path) -> io::Result<()> {
        self.lines.push("Traversing directories:".to_string());
        self.lines.push(root.display().to_string());
        Ok(())
    }

    fn directory_entered(&mut self, name: &str, level: usize) -> io::Result<()> {
        self.lines.push(branch_line(name, level));
        Ok(())
    }

    fn entry_visited(&mut self, path: &Path) -> io::Result<()> {
        self.lines.push(path.display().to_string());
        Ok(())
    }

    fn symlink_found(&mut self, kind: EntryKind, path: &Path) -> io::Result<()> {
        self.lines.push(symlink_line(kind, path));
        Ok(())
    }

    fn entry_not_writable(&mut self, path: &Path) -> io::Result<()> {
        self.lines
            .push(format!("{} {}", WARNING_PREFIX, not_writable_message(path)));
        Ok(())
    }

    fn entry_unreadable(&mut self, path: &Path, error: &io::Error) -> io::Result<()> {
        self.lines
            .push(format!("{} {}", ERROR_PREFIX, unreadable_message(path, error)));
        Ok(())
    }
}
