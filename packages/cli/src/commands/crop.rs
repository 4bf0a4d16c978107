use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Args;
use common::{DistributorInfo, FarmerInfo, RetailerInfo, Role, SupplyChainEntry};
use console::style;
use serde_json::json;
use store::NewCrop;
use uuid::Uuid;

use crate::commands::{Ctx, remote_or, require_local_user};
use crate::output;

/// Crop fields shared by `crop add` and `crop update`. Everything is
/// optional; the store fills documented defaults on creation.
#[derive(Args)]
pub struct CropFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "type")]
    pub crop_type: Option<String>,
    /// Harvest date, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub harvest_date: Option<NaiveDate>,
    /// Expiry date, YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub expiry_date: Option<NaiveDate>,
    #[arg(long)]
    pub soil_type: Option<String>,
    #[arg(long)]
    pub pesticides: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
}

impl CropFields {
    fn to_body(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "crop_type": self.crop_type,
            "harvest_date": self.harvest_date,
            "expiry_date": self.expiry_date,
            "soil_type": self.soil_type,
            "pesticides_used": self.pesticides,
            "image_url": self.image_url,
        })
    }

    fn to_new_crop(&self) -> NewCrop {
        NewCrop {
            name: self.name.clone(),
            crop_type: self.crop_type.clone(),
            harvest_date: self.harvest_date,
            expiry_date: self.expiry_date,
            soil_type: self.soil_type.clone(),
            pesticides_used: self.pesticides.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Handoff details recorded by distributors and retailers.
#[derive(Args)]
pub struct HandoffArgs {
    /// Supplying farmer's 3-digit code (distributor handoffs).
    #[arg(long)]
    pub farmer: Option<String>,
    /// Supplying distributor's 3-digit code (retailer handoffs).
    #[arg(long)]
    pub distributor: Option<String>,
    /// Receipt date, YYYY-MM-DD; defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub received_date: Option<NaiveDate>,
    #[arg(long)]
    pub sent_to_retailer: Option<String>,
    #[arg(long)]
    pub retailer_location: Option<String>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn list(ctx: &Ctx) -> Result<()> {
    let crops = remote_or(
        || ctx.api.list_crops(),
        || {
            let store = ctx.open_store()?;
            let user = require_local_user(&store)?;
            Ok(store.crops_for_user(user.id))
        },
    )?;
    output::crop_list(&crops);
    Ok(())
}

pub fn add(ctx: &Ctx, fields: &CropFields) -> Result<()> {
    let crop = remote_or(
        || ctx.api.create_crop(&fields.to_body()),
        || {
            let mut store = ctx.open_store()?;
            let user = require_local_user(&store)?;
            let mut crop = store.add_crop(fields.to_new_crop(), user.id)?;
            if user.role == Role::Farmer {
                crop.farmer_info = FarmerInfo::from_profile(&user);
                crop = store.update_crop(crop)?;
            }
            Ok(crop)
        },
    )?;
    println!("{}", style("Crop recorded.").green());
    output::crop(&crop);
    Ok(())
}

pub fn show(ctx: &Ctx, id: Uuid) -> Result<()> {
    let crop = remote_or(
        || ctx.api.get_crop(id),
        || {
            let store = ctx.open_store()?;
            store
                .find_crop(id)
                .cloned()
                .context("Crop not found")
        },
    )?;
    output::crop(&crop);
    Ok(())
}

pub fn update(ctx: &Ctx, id: Uuid, fields: &CropFields) -> Result<()> {
    let crop = remote_or(
        || ctx.api.update_crop(id, &fields.to_body()),
        || {
            let mut store = ctx.open_store()?;
            let user = require_local_user(&store)?;
            let mut crop = store
                .find_crop(id)
                .filter(|c| c.user_id == user.id)
                .cloned()
                .context("Crop not found")?;
            apply_fields(&mut crop, fields);
            Ok(store.update_crop(crop)?)
        },
    )?;
    println!("{}", style("Crop updated.").green());
    output::crop(&crop);
    Ok(())
}

pub fn delete(ctx: &Ctx, id: Uuid) -> Result<()> {
    remote_or(
        || ctx.api.delete_crop(id),
        || {
            let mut store = ctx.open_store()?;
            let user = require_local_user(&store)?;
            if store.find_crop(id).is_none_or(|c| c.user_id != user.id) {
                bail!("Crop not found");
            }
            store.delete_crop(id)?;
            Ok(())
        },
    )?;
    println!("Crop deleted.");
    Ok(())
}

pub fn acquire(ctx: &Ctx, id: Uuid, supplier: &str) -> Result<()> {
    let crop = remote_or(
        || ctx.api.acquire_crop(id, supplier),
        || {
            let mut store = ctx.open_store()?;
            let buyer = require_local_user(&store)?;

            let (supplier_profile, listed) = match buyer.role {
                Role::Distributor => {
                    let farmer = store
                        .find_farmer_by_code(supplier)
                        .map(|u| u.profile())
                        .context("Farmer not found")?;
                    (farmer, store.crops_by_farmer_code(supplier))
                }
                Role::Retailer => {
                    let distributor = store
                        .find_distributor_by_code(supplier)
                        .map(|u| u.profile())
                        .context("Distributor not found")?;
                    (distributor, store.crops_by_distributor_code(supplier))
                }
                _ => bail!("Only distributors and retailers can acquire crops"),
            };

            let source = listed
                .into_iter()
                .find(|c| c.id == id)
                .context("Crop not found under that supplier code")?;

            let mut copy = source.copied_to(&buyer);
            if buyer.role == Role::Distributor {
                copy.farmer_info = FarmerInfo::from_profile(&supplier_profile);
            }
            let copy = store.insert_crop(copy)?;
            store.add_entry(SupplyChainEntry::new(
                copy.id,
                buyer.id,
                buyer.role,
                json!({
                    "action": "acquired",
                    "supplier_id": supplier,
                    "source_crop_id": source.id,
                }),
            ))?;
            Ok(copy)
        },
    )?;
    println!("{}", style("Crop acquired.").green());
    output::crop(&crop);
    Ok(())
}

pub fn handoff(ctx: &Ctx, id: Uuid, args: &HandoffArgs) -> Result<()> {
    // Snapshots store the receipt date as entered; default to today.
    let received = args
        .received_date
        .unwrap_or_else(|| Utc::now().date_naive())
        .to_string();
    let body = json!({
        "farmer_id": args.farmer,
        "distributor_id": args.distributor,
        "received_date": received.clone(),
        "sent_to_retailer": args.sent_to_retailer,
        "retailer_location": args.retailer_location,
    });

    let crop = remote_or(
        || ctx.api.handoff_crop(id, &body),
        || {
            let mut store = ctx.open_store()?;
            let holder = require_local_user(&store)?;
            let mut crop = store
                .find_crop(id)
                .filter(|c| c.user_id == holder.id)
                .cloned()
                .context("Crop not found")?;

            let details = match holder.role {
                Role::Distributor => {
                    let code = args
                        .farmer
                        .as_deref()
                        .context("A farmer code is required (--farmer)")?;
                    let farmer = store
                        .find_farmer_by_code(code)
                        .map(|u| u.profile())
                        .context("Invalid farmer ID. Please check and try again.")?;

                    crop.farmer_info = FarmerInfo::from_profile(&farmer);
                    crop.distributor_info = Some(DistributorInfo {
                        name: holder.display_name(),
                        location: holder.display_location(),
                        received_date: received.clone(),
                        sent_to_retailer: args.sent_to_retailer.clone().unwrap_or_default(),
                        retailer_location: args.retailer_location.clone().unwrap_or_default(),
                    });
                    json!({
                        "farmer_id": code,
                        "received_date": received,
                        "sent_to_retailer": args.sent_to_retailer,
                        "retailer_location": args.retailer_location,
                    })
                }
                Role::Retailer => {
                    let code = args
                        .distributor
                        .as_deref()
                        .context("A distributor code is required (--distributor)")?;
                    let distributor = store
                        .find_distributor_by_code(code)
                        .map(|u| u.profile())
                        .context("Invalid distributor ID. Please check and try again.")?;

                    crop.retailer_info = Some(RetailerInfo {
                        name: holder.display_name(),
                        location: holder.display_location(),
                        received_date: received.clone(),
                        received_from_distributor: distributor.display_name(),
                        distributor_location: distributor.display_location(),
                    });
                    json!({
                        "distributor_id": code,
                        "received_date": received,
                        "action": "received_from_distributor",
                    })
                }
                _ => bail!("Only distributors and retailers can record handoffs"),
            };

            let crop = store.update_crop(crop)?;
            store.add_entry(SupplyChainEntry::new(crop.id, holder.id, holder.role, details))?;
            Ok(crop)
        },
    )?;
    println!("{}", style("Handoff recorded.").green());
    output::crop(&crop);
    Ok(())
}

pub fn trace(ctx: &Ctx, id: Uuid) -> Result<()> {
    let entries = remote_or(
        || ctx.api.trace_crop(id),
        || {
            let store = ctx.open_store()?;
            if store.find_crop(id).is_none() {
                bail!("Crop not found");
            }
            Ok(store.entries_for_crop(id))
        },
    )?;
    output::trail(&entries);
    Ok(())
}

fn apply_fields(crop: &mut common::Crop, fields: &CropFields) {
    if let Some(name) = &fields.name {
        crop.name = name.clone();
    }
    if let Some(crop_type) = &fields.crop_type {
        crop.crop_type = crop_type.clone();
    }
    if let Some(date) = fields.harvest_date {
        crop.harvest_date = date;
    }
    if let Some(date) = fields.expiry_date {
        crop.expiry_date = date;
    }
    if let Some(soil) = &fields.soil_type {
        crop.soil_type = soil.clone();
    }
    if let Some(pesticides) = &fields.pesticides {
        crop.pesticides_used = pesticides.clone();
    }
    if let Some(url) = &fields.image_url {
        crop.image_url = Some(url.clone());
    }
}
