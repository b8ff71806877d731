//! Describing a single directory entry for the listing page
//!
//! [`EntryDescriber`] turns a path into a [`ListingEntry`], or decides the
//! entry does not belong on the page. Nothing in here is fatal: entries that
//! cannot be inspected are reported and skipped.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::output::Reporter;
use crate::tree::utils::file_name_string;
use crate::tree::{IndexConfig, format_size};

/// Shown instead of a size for directories and unstatted entries.
pub const NO_SIZE: &str = "\u{2014}";

/// Shown instead of a human readable time when none is known.
pub const NO_TIME: &str = "-";

/// What an entry is, as far as the page is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    File,
    Folder,
    FileShortcut,
    FolderShortcut,
}

impl EntryKind {
    /// Kind from whether the entry resolves to a directory and whether it is
    /// itself a symbolic link.
    pub fn from_flags(is_dir: bool, is_symlink: bool) -> Self {
        match (is_dir, is_symlink) {
            (false, false) => Self::File,
            (false, true) => Self::FileShortcut,
            (true, false) => Self::Folder,
            (true, true) => Self::FolderShortcut,
        }
    }

    pub fn is_dir(self) -> bool {
        matches!(self, Self::Folder | Self::FolderShortcut)
    }

}

/// One row of a listing page. Field names are what templates see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Link target relative to the page
    pub path: String,
    #[serde(rename = "entrytype")]
    pub kind: EntryKind,
    pub name: String,
    /// `-1` when the entry has no size (directories)
    pub size_bytes: i64,
    pub size_pretty: String,
    pub last_modified_iso: String,
    #[serde(rename = "last_modified_human_readable")]
    pub last_modified_human: String,
}

impl ListingEntry {
    fn new(name: String, kind: EntryKind, path: String) -> Self {
        Self {
            path,
            kind,
            name,
            size_bytes: -1,
            size_pretty: NO_SIZE.to_string(),
            last_modified_iso: String::new(),
            last_modified_human: NO_TIME.to_string(),
        }
    }

    fn set_size(&mut self, bytes: u64) {
        self.size_bytes = i64::try_from(bytes).unwrap_or(i64::MAX);
        self.size_pretty = format_size(bytes);
    }

    fn set_modified(&mut self, mtime: SystemTime) {
        let local: DateTime<Local> = mtime.into();
        let local = local.with_nanosecond(0).unwrap_or(local);
        self.last_modified_iso = local.format("%Y-%m-%dT%H:%M:%S").to_string();
        self.last_modified_human = local.format("%c").to_string();
    }
}

/// Percent-encode a single path segment for use in an `href`.
pub fn link_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Link from a listing page to the index page of the child directory `name`.
pub fn index_href(name: &str, output_file: &str) -> String {
    format!("{}/{}", link_segment(name), link_segment(&output_file.to_lowercase()))
}

/// Outcome of describing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Listed(ListingEntry),
    /// The entry is the generated index itself
    Excluded,
    /// The entry could not be used; the reporter has been told why
    Skipped,
}

/// Inspects entries of a directory being indexed.
pub struct EntryDescriber<'a> {
    config: &'a IndexConfig,
}

impl<'a> EntryDescriber<'a> {
    pub fn new(config: &'a IndexConfig) -> Self {
        Self { config }
    }

    pub fn describe<R: Reporter + ?Sized>(
        &self,
        path: &Path,
        reporter: &mut R,
    ) -> Result<Description> {
        let name = file_name_string(path).unwrap_or_else(|| path.display().to_string());
        if self.config.is_index_file(&name) {
            return Ok(Description::Excluded);
        }

        let abs = absolute(path);
        let link_meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) => {
                reporter.entry_unreadable(&abs, &e)?;
                return Ok(Description::Skipped);
            }
        };
        let is_symlink = link_meta.file_type().is_symlink();

        if !is_symlink && !is_writable(path) {
            reporter.entry_not_writable(&abs)?;
            return Ok(Description::Skipped);
        }

        if self.config.verbose {
            reporter.entry_visited(&abs)?;
        }

        // Symlinks are described by what they point at. A dangling link has
        // no target and gets neither size nor time.
        let target = if is_symlink {
            fs::metadata(path).ok()
        } else {
            Some(link_meta)
        };
        let is_dir = target.as_ref().is_some_and(Metadata::is_dir);
        let is_file = target.as_ref().is_some_and(Metadata::is_file);
        let kind = EntryKind::from_flags(is_dir, is_symlink);

        let href = if is_dir {
            index_href(&name, &self.config.output_file)
        } else {
            link_segment(&name)
        };
        let mut entry = ListingEntry::new(name, kind, href);

        if let Some(meta) = target.filter(|m| m.is_dir() || m.is_file()) {
            let mtime = match meta.modified() {
                Ok(t) => t,
                Err(e) => {
                    reporter.entry_unreadable(&abs, &e)?;
                    return Ok(Description::Skipped);
                }
            };
            if is_file {
                entry.set_size(meta.len());
            }
            entry.set_modified(mtime);

            if is_symlink {
                reporter.symlink_found(kind, &abs)?;
            }
        } else {
            debug!(path = %abs.display(), "listing entry without size or time");
        }

        Ok(Description::Listed(entry))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether the current process may write to `path`.
#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    access(path, AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
