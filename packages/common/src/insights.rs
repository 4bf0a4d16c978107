//! Placeholder "intelligence" widgets.
//!
//! The source product dressed `Math.random()` up as AI analysis, weather,
//! price trends, and a chatbot. These generators reproduce those fixed
//! ranges and canned responses; there is no model and no external API
//! behind any of them.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Mock quality analysis of a crop photo/record.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CropAnalysis {
    #[schema(example = "Excellent")]
    pub condition: String,
    /// Percentage, 70-100.
    pub freshness: u8,
    /// Percentage, 70-100.
    pub ripeness: u8,
    /// Estimated remaining shelf life in days, 3-12.
    pub shelf_life_days: u8,
    /// Model confidence percentage, 80-100.
    pub confidence: u8,
    pub recommendations: Vec<String>,
}

const CONDITIONS: &[&str] = &["Excellent", "Good", "Fair", "Needs Attention"];

const RECOMMENDATIONS: &[&str] = &[
    "Store in a cool, dry place away from direct sunlight",
    "Prioritize for sale within the estimated shelf life",
    "Consider 10-15% price reduction",
    "Suitable for long-distance transport",
    "Keep separated from ethylene-producing produce",
];

pub fn analyze_crop() -> CropAnalysis {
    let mut rng = rand::rng();
    let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())].to_string();
    let mut recommendations: Vec<String> = RECOMMENDATIONS
        .iter()
        .filter(|_| rng.random_bool(0.5))
        .map(|s| s.to_string())
        .collect();
    if recommendations.is_empty() {
        recommendations.push(RECOMMENDATIONS[rng.random_range(0..RECOMMENDATIONS.len())].into());
    }
    CropAnalysis {
        condition,
        freshness: rng.random_range(70..=100),
        ripeness: rng.random_range(70..=100),
        shelf_life_days: rng.random_range(3..=12),
        confidence: rng.random_range(80..=100),
        recommendations,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
}

/// Mock current-weather reading for a location.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WeatherReport {
    pub location: String,
    /// Degrees Celsius.
    pub temperature: i32,
    pub condition: WeatherCondition,
    /// Percentage.
    pub humidity: u8,
    /// km/h.
    pub wind_speed: u8,
}

pub fn weather_for(location: &str) -> WeatherReport {
    let mut rng = rand::rng();
    // Coarse climate bands keyed off the location text, like the source's
    // per-region range tables.
    let lower = location.to_lowercase();
    let (temp_base, temp_span, humidity_base) = if lower.contains("coast") || lower.contains("mombasa") {
        (28, 8, 70)
    } else if lower.contains("highland") || lower.contains("nakuru") {
        (20, 8, 65)
    } else if lower.contains("arid") || lower.contains("north") {
        (25, 10, 50)
    } else {
        (22, 10, 60)
    };

    let condition = match rng.random_range(0..3) {
        0 => WeatherCondition::Sunny,
        1 => WeatherCondition::Cloudy,
        _ => WeatherCondition::Rainy,
    };

    WeatherReport {
        location: location.to_string(),
        temperature: temp_base + rng.random_range(0..temp_span),
        condition,
        humidity: humidity_base + rng.random_range(0..30),
        wind_speed: rng.random_range(5..=20),
    }
}

/// One point in a mock market price series.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Price per kg in local currency.
    pub price: f64,
}

/// Mock market price trend for a crop type.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PriceTrend {
    pub crop_type: String,
    pub points: Vec<PricePoint>,
}

/// Generate a bounded random walk of daily prices ending today.
pub fn price_trend(crop_type: &str, days: u32) -> PriceTrend {
    let mut rng = rand::rng();
    let base: f64 = match crop_type.to_lowercase().as_str() {
        "fruit" => 120.0,
        "vegetable" => 80.0,
        "grain" => 45.0,
        "legume" => 95.0,
        _ => 60.0,
    };

    let today = Utc::now().date_naive();
    let mut price = base;
    let mut points = Vec::with_capacity(days as usize);
    for offset in (0..days).rev() {
        price = (price + rng.random_range(-5.0..5.0)).max(base * 0.5);
        points.push(PricePoint {
            date: today - Duration::days(i64::from(offset)),
            price: (price * 100.0).round() / 100.0,
        });
    }

    PriceTrend {
        crop_type: crop_type.to_string(),
        points,
    }
}

const FARMING_TIPS: &[&str] = &[
    "Rotate crops each season to keep soil nutrients balanced.",
    "Test soil pH before choosing fertilizer; most crops prefer 6.0-7.0.",
    "Mulching retains moisture and suppresses weeds at low cost.",
    "Keep harvest records; they reveal which varieties earn the most.",
    "Inspect stored produce weekly to catch spoilage early.",
];

/// Keyword-matched canned chatbot reply; falls back to a random tip.
pub fn chat_reply(message: &str) -> String {
    let message = message.to_lowercase();

    if message.contains("weather") || message.contains("rain") || message.contains("climate") {
        return "Weather plays a crucial role in farming. Monitor temperature, rainfall, and \
                humidity regularly, and use forecasts to plan planting and harvesting. Consider \
                climate-resistant varieties for unpredictable patterns."
            .into();
    }
    if message.contains("price") || message.contains("market") {
        return "For better market prices: research local demand, consider value-added \
                processing, form farmer groups for bargaining power, and use digital platforms \
                to reach buyers directly."
            .into();
    }
    if message.contains("organic") {
        return "Organic farming benefits: use compost and green manure, practice crop \
                rotation, encourage biodiversity, avoid synthetic chemicals, and get certified \
                for premium prices."
            .into();
    }
    if message.contains("pest") || message.contains("insect") {
        return "For pest management, start with prevention: healthy soil, resistant \
                varieties, and beneficial insects. Apply targeted treatments only when \
                monitoring shows damage thresholds are crossed."
            .into();
    }
    if message.contains("soil") || message.contains("fertilizer") {
        return "Healthy soil is the foundation: test regularly, add organic matter, avoid \
                over-tilling, and match fertilizer to what the test says is missing."
            .into();
    }
    if message.contains("water") || message.contains("irrigation") {
        return "Irrigate early morning or late evening to cut evaporation. Drip systems use \
                up to 60% less water than overhead sprinklers."
            .into();
    }

    let mut rng = rand::rng();
    FARMING_TIPS[rng.random_range(0..FARMING_TIPS.len())].into()
}
