use std::path::Path;

use crate::commands::common::open_read_only;

pub struct Keys;

impl Keys {
    pub fn execute(file: &Path, path: Option<&str>, deep: bool) -> anyhow::Result<()> {
        let doc = open_read_only(file)?;

        let section = match path {
            Some(path) => doc
                .resolve(path)
                .ok_or_else(|| anyhow::anyhow!("Path not found: {path}"))?,
            None => doc.root(),
        };

        for key in section.keys(deep) {
            println!("{key}");
        }
        Ok(())
    }
}
