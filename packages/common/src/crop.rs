use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserProfile;

/// A tracked harvest batch.
///
/// `user_id` always points at the current holder. Passing a crop down the
/// chain copies the record under the new holder's id rather than mutating
/// the original, so one physical batch exists as N rows once N participants
/// have handled it. The `*_info` snapshots are copied by value at handoff
/// time; later edits to a participant's profile do not propagate here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Crop {
    pub id: Uuid,
    #[schema(example = "Hass Avocado")]
    pub name: String,
    #[schema(example = "Fruit")]
    pub crop_type: String,
    pub harvest_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[schema(example = "Loam")]
    pub soil_type: String,
    #[schema(example = "None")]
    pub pesticides_used: String,
    /// Data URL or remote URL of the crop photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Current holder.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_info: Option<FarmerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_info: Option<DistributorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retailer_info: Option<RetailerInfo>,
}

/// Origin snapshot, stamped when the farmer records the crop or when a
/// distributor acquires it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FarmerInfo {
    /// The farmer's 3-digit lookup code.
    #[schema(example = "412")]
    pub farmer_id: String,
    pub name: String,
    pub location: String,
}

impl FarmerInfo {
    /// Snapshot a farmer's current profile. Returns `None` when the profile
    /// carries no farmer code (i.e. the user is not a farmer).
    pub fn from_profile(farmer: &UserProfile) -> Option<Self> {
        Some(Self {
            farmer_id: farmer.farmer_id.clone()?,
            name: farmer.display_name(),
            location: farmer.display_location(),
        })
    }
}

/// Distribution-leg snapshot, stamped when a distributor records handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DistributorInfo {
    pub name: String,
    pub location: String,
    /// Date the distributor received the batch (free-form, as entered).
    pub received_date: String,
    pub sent_to_retailer: String,
    pub retailer_location: String,
}

/// Retail-leg snapshot, stamped when a retailer records receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RetailerInfo {
    pub name: String,
    pub location: String,
    pub received_date: String,
    pub received_from_distributor: String,
    pub distributor_location: String,
}

impl Crop {
    /// Copy this crop into a new record owned by `new_owner`, as happens
    /// when a participant acquires stock from a supplier. The copy gets a
    /// fresh id and creation time; snapshots carry over.
    pub fn copied_to(&self, new_owner: &UserProfile) -> Crop {
        Crop {
            id: Uuid::new_v4(),
            user_id: new_owner.id,
            created_at: Utc::now(),
            ..self.clone()
        }
    }
}
