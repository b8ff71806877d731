//! Configuration for index generation

/// Output file written into every visited directory unless overridden.
pub const DEFAULT_OUTPUT_FILE: &str = "index.html";

/// Glob used when no filter is given: everything not starting with a dot.
pub const DEFAULT_PATTERN: &str = "[!.]*";

/// Options shared by every stage of a run. Built once from the command line
/// and only read afterwards.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Include entries (and descend into directories) whose name starts with `.`
    pub show_all: bool,
    pub recursive: bool,
    /// Print every processed entry
    pub verbose: bool,
    /// Glob pattern replacing [`DEFAULT_PATTERN`]
    pub filter: Option<String>,
    pub output_file: String,
}

impl IndexConfig {
    /// The glob pattern used to enumerate directory children.
    pub fn pattern(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Lowercased output file name, used for links between pages.
    pub fn index_name(&self) -> String {
        self.output_file.to_lowercase()
    }

    /// Whether `name` refers to the generated index itself.
    pub fn is_index_file(&self, name: &str) -> bool {
        name.to_lowercase() == self.index_name()
    }

    /// Whether a name should be dropped as hidden under this configuration.
    pub fn hides(&self, name: &str) -> bool {
        !self.show_all && name.starts_with('.')
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            show_all: false,
            recursive: false,
            verbose: false,
            filter: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}
