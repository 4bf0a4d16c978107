use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde_json::Value;

use crate::commands::{Ctx, remote_or};

/// Dump the data set as JSON, to a file or stdout.
pub fn export(ctx: &Ctx, out: Option<&Path>) -> Result<()> {
    let blob = remote_or(
        || ctx.api.export_data(),
        || {
            let store = ctx.open_store()?;
            let raw = store.export_json()?;
            serde_json::from_str(&raw).context("Export produced malformed JSON")
        },
    )?;

    let rendered = serde_json::to_string_pretty(&blob)?;
    match out {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", style("Exported to").green(), path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Replace the data set with a previously exported document.
pub fn import(ctx: &Ctx, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let blob: Value =
        serde_json::from_str(&raw).with_context(|| format!("Malformed JSON in {}", path.display()))?;

    remote_or(
        || ctx.api.import_data(&blob),
        || {
            let mut store = ctx.open_store()?;
            store.import_json(&raw)?;
            Ok(())
        },
    )?;
    println!("{}", style("Data set imported.").green());
    Ok(())
}
