//! Terminal rendering for domain objects.

use common::insights::{CropAnalysis, PriceTrend, WeatherReport};
use common::{Crop, SupplyChainEntry, UserProfile};
use console::style;

pub fn profile(user: &UserProfile) {
    println!("{}", style(user.display_name()).bold());
    println!("  email:    {}", user.email);
    println!("  role:     {}", user.role);
    if let Some(code) = &user.farmer_id {
        println!("  farmer #: {}", style(code).cyan());
    }
    if let Some(code) = &user.distributor_id {
        println!("  dist. #:  {}", style(code).cyan());
    }
    println!("  location: {}", user.display_location());
}

pub fn crop(crop: &Crop) {
    println!(
        "{}  {}",
        style(&crop.name).bold(),
        style(crop.id).dim()
    );
    println!("  type:       {}", crop.crop_type);
    println!("  harvested:  {}", crop.harvest_date);
    println!("  expires:    {}", crop.expiry_date);
    println!("  soil:       {}", crop.soil_type);
    println!("  pesticides: {}", crop.pesticides_used);

    if let Some(info) = &crop.farmer_info {
        println!(
            "  {} #{} {} ({})",
            style("farmer").green(),
            info.farmer_id,
            info.name,
            info.location
        );
    }
    if let Some(info) = &crop.distributor_info {
        println!(
            "  {} {} ({}), received {}",
            style("distributor").yellow(),
            info.name,
            info.location,
            info.received_date
        );
        if !info.sent_to_retailer.is_empty() {
            println!(
                "    sent to {} ({})",
                info.sent_to_retailer, info.retailer_location
            );
        }
    }
    if let Some(info) = &crop.retailer_info {
        println!(
            "  {} {} ({}), received {} from {}",
            style("retailer").magenta(),
            info.name,
            info.location,
            info.received_date,
            info.received_from_distributor
        );
    }
}

pub fn crop_list(crops: &[Crop]) {
    if crops.is_empty() {
        println!("{}", style("No crops recorded.").dim());
        return;
    }
    for c in crops {
        println!(
            "{}  {}  {}  harvested {}",
            style(c.id).dim(),
            style(&c.name).bold(),
            c.crop_type,
            c.harvest_date
        );
    }
}

pub fn trail(entries: &[SupplyChainEntry]) {
    if entries.is_empty() {
        println!("{}", style("No supply-chain entries.").dim());
        return;
    }
    for entry in entries {
        println!(
            "{}  {}  {}",
            entry.entry_date.format("%Y-%m-%d %H:%M"),
            style(entry.user_role).bold(),
            entry.details
        );
    }
}

pub fn weather(report: &WeatherReport) {
    println!("{}", style(&report.location).bold());
    println!("  {:?}, {}°C", report.condition, report.temperature);
    println!(
        "  humidity {}%, wind {} km/h",
        report.humidity, report.wind_speed
    );
}

pub fn analysis(a: &CropAnalysis) {
    println!(
        "{} ({}% confidence)",
        style(&a.condition).bold(),
        a.confidence
    );
    println!("  freshness:  {}%", a.freshness);
    println!("  ripeness:   {}%", a.ripeness);
    println!("  shelf life: {} days", a.shelf_life_days);
    for rec in &a.recommendations {
        println!("  - {}", rec);
    }
}

pub fn prices(trend: &PriceTrend) {
    println!("{}", style(&trend.crop_type).bold());
    for point in &trend.points {
        println!("  {}  {:>8.2}", point.date, point.price);
    }
}
