//! Shared utility functions for tree walking

use std::path::Path;

use glob::Pattern;

use crate::error::{Error, Result};

/// Units tried from largest to smallest when formatting sizes.
const UNITS: [(u64, &str); 6] = [
    (1 << 50, "P"),
    (1 << 40, "T"),
    (1 << 30, "G"),
    (1 << 20, "M"),
    (1 << 10, "K"),
    (1, "B"),
];

/// Compile a glob pattern, reporting the offending pattern on failure.
pub fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Final path component as a display string.
pub fn file_name_string(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().into_owned())
}

/// Format a size in bytes to human-readable format.
///
/// Picks the largest 1024-based unit not exceeding `bytes`. Bytes are shown
/// as an integer; other units get two decimals below 10, one below 100 and
/// none above.
pub fn format_size(bytes: u64) -> String {
    let (factor, suffix) = UNITS
        .iter()
        .copied()
        .find(|&(factor, _)| bytes >= factor)
        .unwrap_or((1, "B"));

    if factor == 1 {
        return format!("{} {}", bytes, suffix);
    }

    let amount = bytes as f64 / factor as f64;
    if amount < 10.0 {
        format!("{:.2} {}", amount, suffix)
    } else if amount < 100.0 {
        format!("{:.1} {}", amount, suffix)
    } else {
        format!("{} {}", amount.trunc() as u64, suffix)
    }
}
