use std::io;
use std::path::Path;

use dotconf::{ConfigDocument, IgnoreSet, Source};

pub struct Merge;

impl Merge {
    pub fn execute(
        file: &Path,
        defaults: &Path,
        ignore: &[String],
        dry_run: bool,
    ) -> anyhow::Result<()> {
        if !defaults.is_file() {
            anyhow::bail!("Defaults file not found: {}", defaults.display());
        }

        let mut doc = ConfigDocument::new(Some(Source::from(file)), Some(Source::from(defaults)));
        if !dry_run {
            doc = doc.with_destination(file);
        }

        let ignore: IgnoreSet = ignore.iter().cloned().collect();
        let report = doc.load_with(true, &ignore);

        if report.saved == Some(false) {
            anyhow::bail!("Failed to write {}", file.display());
        }

        if dry_run {
            let stdout = io::stdout();
            if !doc.save_to_writer(&mut stdout.lock()) {
                anyhow::bail!("Failed to render merged document");
            }
            return Ok(());
        }

        if report.merged {
            println!(
                "Seeded {} from defaults ({} nodes)",
                file.display(),
                report.nodes
            );
        } else {
            println!(
                "{} already has content; defaults not copied ({} nodes)",
                file.display(),
                report.nodes
            );
        }
        Ok(())
    }
}
