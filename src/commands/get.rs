use std::path::Path;

use crate::commands::common::open_read_only;

pub struct Get;

impl Get {
    pub fn execute(file: &Path, path: &str, list: bool) -> anyhow::Result<()> {
        let doc = open_read_only(file)?;

        if !doc.contains(path) {
            anyhow::bail!("Path not found: {path}");
        }

        if list {
            for value in doc.get_string_list(path) {
                println!("{value}");
            }
            return Ok(());
        }

        if doc.is_section(path) {
            anyhow::bail!("'{path}' is a section, use `dotconf keys` to list it");
        }

        println!("{}", doc.get_string(path));
        Ok(())
    }
}
