//! Directory traversal
//!
//! `DirectoryWalker` visits a directory, writes its index page and, when
//! recursion is on, does the same for every listed subdirectory.

mod config;
pub(crate) mod utils;
mod walker;

pub use config::{DEFAULT_OUTPUT_FILE, DEFAULT_PATTERN, IndexConfig};
pub use utils::{compile_pattern, format_size};
pub use walker::{DirectoryWalker, WalkSummary};
