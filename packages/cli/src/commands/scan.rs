use anyhow::{Context, Result, anyhow};
use common::qr;
use console::style;

use crate::api::Provenance;
use crate::commands::{Ctx, remote_or};
use crate::output;

pub fn scan(ctx: &Ctx, payload: &str) -> Result<()> {
    let provenance = remote_or(
        || ctx.api.scan(payload),
        || {
            let crop_id = qr::decode_payload(payload).map_err(|e| anyhow!(e.to_string()))?;
            let store = ctx.open_store()?;
            let crop = store
                .find_crop(crop_id)
                .cloned()
                .context("Crop not found")?;
            Ok(Provenance {
                supply_chain: store.entries_for_crop(crop_id),
                crop,
            })
        },
    )?;

    output::crop(&provenance.crop);
    println!("\n{}", style("Supply chain").bold());
    output::trail(&provenance.supply_chain);
    Ok(())
}
