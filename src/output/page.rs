//! HTML page rendering
//!
//! Templates are looked up by name in a process-wide environment that is
//! built once and never changed afterwards. The built-in template is compiled
//! into the binary; [`PageRenderer::install_template`] swaps in a custom one
//! before the first page is rendered.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use minijinja::{AutoEscape, Environment, ErrorKind};
use serde::Serialize;

use crate::entry::ListingEntry;
use crate::error::{Error, Result};

/// Name under which the listing template is registered.
pub const INDEX_TEMPLATE: &str = "index.html.jinja";

const BUILTIN_TEMPLATE: &str = include_str!("templates/index.html.jinja");

static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();

/// Everything a template sees when rendering one directory.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub entries: Vec<ListingEntry>,
    /// Path of the directory being listed
    pub path_top_dir: String,
    /// Lowercased, percent-encoded output file name, for links between pages
    pub index_name: String,
    /// The page lists the directory the walk started from, so it has no
    /// parent page to link to
    pub is_root: bool,
}

/// Renders listing pages from the shared template environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRenderer;

impl PageRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Replace the built-in template with the one at `path`.
    ///
    /// Must run before anything is rendered; the environment cannot change
    /// once it exists.
    pub fn install_template(path: &Path) -> Result<()> {
        let source = fs::read_to_string(path).map_err(|source| Error::TemplateFile {
            path: path.to_path_buf(),
            source,
        })?;
        let env = build_environment(source)?;
        ENVIRONMENT.set(env).map_err(|_| {
            Error::Template(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                "template environment is already initialized",
            ))
        })
    }

    pub fn render(&self, context: &PageContext) -> Result<String> {
        let template = environment()?.get_template(INDEX_TEMPLATE)?;
        Ok(template.render(context)?)
    }
}

fn environment() -> Result<&'static Environment<'static>> {
    if let Some(env) = ENVIRONMENT.get() {
        return Ok(env);
    }
    let env = build_environment(BUILTIN_TEMPLATE)?;
    // Another caller may have won the race; either value is the built-in one
    // or an installed template, and both are final.
    Ok(ENVIRONMENT.get_or_init(|| env))
}

fn build_environment(source: impl Into<Cow<'static, str>>) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template_owned(INDEX_TEMPLATE, source)?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    fn entry(name: &str, kind: EntryKind, path: &str) -> ListingEntry {
        ListingEntry {
            path: path.to_string(),
            kind,
            name: name.to_string(),
            size_bytes: -1,
            size_pretty: "\u{2014}".to_string(),
            last_modified_iso: "2024-03-01T12:30:00".to_string(),
            last_modified_human: "Fri Mar  1 12:30:00 2024".to_string(),
        }
    }

    fn render_page(entries: Vec<ListingEntry>, is_root: bool) -> String {
        PageRenderer::new()
            .render(&PageContext {
                entries,
                path_top_dir: "srv-files".to_string(),
                index_name: "index.html".to_string(),
                is_root,
            })
            .unwrap()
    }

    fn render(entries: Vec<ListingEntry>) -> String {
        render_page(entries, false)
    }

    #[test]
    fn test_render_lists_entries_in_order() {
        let html = render(vec![
            entry("docs", EntryKind::Folder, "docs/index.html"),
            entry("readme.txt", EntryKind::File, "readme.txt"),
        ]);
        // Slashes come out entity-encoded inside attributes
        assert!(html.contains("href=\"docs"));
        assert!(html.contains("href=\"readme.txt\""));
        assert!(html.find("docs").unwrap() < html.find("readme.txt").unwrap());
        assert!(html.contains("srv-files"));
        assert!(html.contains("datetime=\"2024-03-01T12:30:00\""));
    }

    #[test]
    fn test_render_marks_entry_type() {
        let html = render(vec![
            entry("link", EntryKind::FolderShortcut, "link/index.html"),
            entry("alias", EntryKind::FileShortcut, "alias"),
        ]);
        assert!(html.contains("class=\"folder-shortcut\""));
        assert!(html.contains("class=\"file-shortcut\""));
    }

    #[test]
    fn test_render_escapes_names() {
        let html = render(vec![entry(
            "<script>alert(1)</script>",
            EntryKind::File,
            "a\"b.txt",
        )]);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("href=\"a\"b.txt\""));
    }

    #[test]
    fn test_parent_link_only_below_root() {
        let nested = render_page(Vec::new(), false);
        assert!(nested.contains("Parent directory"));
        assert!(nested.contains("href=\"../index.html\""));

        let root = render_page(Vec::new(), true);
        assert!(!root.contains("Parent directory"));
    }

    #[test]
    fn test_render_empty_directory() {
        let html = render(Vec::new());
        assert!(html.contains("<table"));
        assert!(html.contains("</html>"));
    }
}
