//! Page rendering and console reporting
//!
//! # Module Structure
//!
//! - `config` - Console output configuration
//! - `page` - HTML listing pages rendered from a named template
//! - `reporter` - Progress and warning lines for the operator

mod config;
mod page;
mod reporter;

pub use config::OutputConfig;
pub use page::{INDEX_TEMPLATE, PageContext, PageRenderer};
pub use reporter::{
    ConsoleReporter, ERROR_PREFIX, Reporter, WARNING_PREFIX, branch_line, not_writable_message,
    symlink_line, unreadable_message,
};
