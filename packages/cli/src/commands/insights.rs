use anyhow::{Result, bail};
use common::insights;
use uuid::Uuid;

use crate::commands::{Ctx, remote_or, require_local_user};
use crate::output;

pub fn weather(ctx: &Ctx, location: Option<&str>) -> Result<()> {
    let report = remote_or(
        || ctx.api.weather(location),
        || {
            let resolved = match location {
                Some(loc) => loc.to_string(),
                None => {
                    let store = ctx.open_store()?;
                    require_local_user(&store)?
                        .location
                        .unwrap_or_else(|| "your region".to_string())
                }
            };
            Ok(insights::weather_for(&resolved))
        },
    )?;
    output::weather(&report);
    Ok(())
}

pub fn prices(ctx: &Ctx, crop_type: Option<&str>, days: Option<u32>) -> Result<()> {
    let trend = remote_or(
        || ctx.api.prices(crop_type, days),
        || {
            let crop_type = crop_type.unwrap_or("general");
            let days = days.unwrap_or(14).clamp(1, 90);
            Ok(insights::price_trend(crop_type, days))
        },
    )?;
    output::prices(&trend);
    Ok(())
}

pub fn analyze(ctx: &Ctx, crop_id: Uuid) -> Result<()> {
    let analysis = remote_or(
        || ctx.api.analyze(crop_id),
        || {
            let store = ctx.open_store()?;
            if store.find_crop(crop_id).is_none() {
                bail!("Crop not found");
            }
            Ok(insights::analyze_crop())
        },
    )?;
    output::analysis(&analysis);
    Ok(())
}

pub fn ask(ctx: &Ctx, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message must not be empty");
    }
    let reply = remote_or(
        || ctx.api.chat(message),
        || Ok(insights::chat_reply(message)),
    )?;
    println!("{}", reply);
    Ok(())
}
