//! Operator-facing progress and warning output
//!
//! Everything the walker and describer want the operator to see goes through
//! the [`Reporter`] trait. [`ConsoleReporter`] writes it to stdout, warnings
//! included.

use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::entry::EntryKind;

use super::config::OutputConfig;

/// Callback for walk progress - receives one event per reportable occurrence.
pub trait Reporter {
    /// A walk is starting at `root`.
    fn walk_started(&mut self, root: &Path) -> io::Result<()>;

    /// A directory below the root is being indexed.
    fn directory_entered(&mut self, name: &str, level: usize) -> io::Result<()>;

    /// Verbose mode: an entry is about to be described.
    fn entry_visited(&mut self, path: &Path) -> io::Result<()>;

    fn symlink_found(&mut self, kind: EntryKind, path: &Path) -> io::Result<()>;

    /// The entry failed the write permission check and is left out.
    fn entry_not_writable(&mut self, path: &Path) -> io::Result<()>;

    /// The entry could not be inspected and is left out.
    fn entry_unreadable(&mut self, path: &Path, error: &io::Error) -> io::Result<()>;
}

/// Progress line for a directory `level` steps below the root.
pub fn branch_line(name: &str, level: usize) -> String {
    format!("{}\u{221f} {}", "  ".repeat(level), name)
}

/// Symlink note, tagged by what the link points at.
pub fn symlink_line(kind: EntryKind, path: &Path) -> String {
    let tag = if kind.is_dir() {
        "dir-symlink"
    } else {
        "file-symlink"
    };
    format!("{} {}", tag, path.display())
}

/// `use_color` is already resolved against the terminal and environment, so
/// it is passed on as-is rather than rechecked by termcolor.
fn color_choice(config: &OutputConfig) -> ColorChoice {
    if config.use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

pub const WARNING_PREFIX: &str = "*** WARNING ***";
pub const ERROR_PREFIX: &str = "ERROR";

/// Body of the warning printed after [`WARNING_PREFIX`].
pub fn not_writable_message(path: &Path) -> String {
    format!("entry {} is not writable! SKIPPING!", path.display())
}

/// Body of the error printed after [`ERROR_PREFIX`].
pub fn unreadable_message(path: &Path, error: &io::Error) -> String {
    format!("accessing file name: {} {}", error, path.display())
}

/// Reporter that writes directly to stdout.
pub struct ConsoleReporter {
    stdout: StandardStream,
}

impl ConsoleReporter {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            stdout: StandardStream::stdout(color_choice(&config)),
        }
    }

    fn write_flagged(&mut self, prefix: &str, color: Color, message: &str) -> io::Result<()> {
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.stdout, "{}", prefix)?;
        self.stdout.reset()?;
        writeln!(self.stdout, " {}", message)
    }
}

impl Reporter for ConsoleReporter {
    fn walk_started(&mut self, root: &Path) -> io::Result<()> {
        writeln!(self.stdout, "Traversing directories:")?;
        writeln!(self.stdout, "{}", root.display())
    }

    fn directory_entered(&mut self, name: &str, level: usize) -> io::Result<()> {
        writeln!(self.stdout, "{}", branch_line(name, level))
    }

    fn entry_visited(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.stdout, "{}", path.display())
    }

    fn symlink_found(&mut self, kind: EntryKind, path: &Path) -> io::Result<()> {
        writeln!(self.stdout, "{}", symlink_line(kind, path))
    }

    fn entry_not_writable(&mut self, path: &Path) -> io::Result<()> {
        self.write_flagged(WARNING_PREFIX, Color::Yellow, &not_writable_message(path))
    }

    fn entry_unreadable(&mut self, path: &Path, error: &io::Error) -> io::Result<()> {
        self.write_flagged(ERROR_PREFIX, Color::Red, &unreadable_message(path, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_line_indents_by_level() {
        assert_eq!(branch_line("src", 1), "  \u{221f} src");
        assert_eq!(branch_line("deep", 3), "      \u{221f} deep");
    }

    #[test]
    fn test_symlink_line_tags_target_kind() {
        let path = Path::new("/tmp/link");
        assert_eq!(symlink_line(EntryKind::FolderShortcut, path), "dir-symlink /tmp/link");
        assert_eq!(symlink_line(EntryKind::FileShortcut, path), "file-symlink /tmp/link");
    }

    #[test]
    fn test_color_choice_is_not_rechecked() {
        assert_eq!(color_choice(&OutputConfig { use_color: true }), ColorChoice::Always);
        assert_eq!(color_choice(&OutputConfig { use_color: false }), ColorChoice::Never);
    }

    #[test]
    fn test_warning_messages() {
        let path = Path::new("/srv/locked.txt");
        assert_eq!(
            not_writable_message(path),
            "entry /srv/locked.txt is not writable! SKIPPING!"
        );
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            unreadable_message(path, &err),
            "accessing file name: denied /srv/locked.txt"
        );
    }
}
