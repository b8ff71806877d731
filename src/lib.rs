//! dirindex - write an HTML listing page into every directory of a tree

pub mod entry;
pub mod error;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{Description, EntryDescriber, EntryKind, ListingEntry, index_href, link_segment};
pub use error::{Error, Result};
pub use output::{ConsoleReporter, OutputConfig, PageContext, PageRenderer, Reporter};
pub use tree::{DirectoryWalker, IndexConfig, WalkSummary, format_size};
