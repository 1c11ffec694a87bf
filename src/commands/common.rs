//! Common helpers for command execution

use std::path::Path;

use dotconf::{ConfigDocument, Source};

/// Load `file` read-only: no defaults, nothing written back
///
/// # Errors
///
/// Returns an error if the file does not exist.
pub fn open_read_only(file: &Path) -> anyhow::Result<ConfigDocument> {
    if !file.is_file() {
        anyhow::bail!("Configuration file not found: {}", file.display());
    }

    let mut doc = ConfigDocument::new(Some(Source::from(file)), None);
    doc.load_defaults(false);
    Ok(doc)
}
