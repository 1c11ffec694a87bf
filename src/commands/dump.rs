use std::path::Path;

use anyhow::Context;

use crate::commands::common::open_read_only;

pub struct Dump;

impl Dump {
    pub fn execute(file: &Path, json: bool) -> anyhow::Result<()> {
        let doc = open_read_only(file)?;
        let nodes = doc.flatten();

        if json {
            let text =
                serde_json::to_string_pretty(&nodes).context("Failed to serialize nodes")?;
            println!("{text}");
            return Ok(());
        }

        for node in &nodes {
            if node.is_container() {
                println!("{}", node.path());
            } else {
                println!("{} = {}", node.path(), node.values().join(", "));
            }
        }
        Ok(())
    }
}
