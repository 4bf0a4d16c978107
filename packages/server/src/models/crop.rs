use chrono::NaiveDate;
use common::{Crop, SupplyChainEntry};
use serde::Deserialize;
use store::NewCrop;

use crate::error::AppError;

/// Request body for recording a crop. Missing or blank fields fall back to
/// the store's documented defaults.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCropRequest {
    #[schema(example = "Hass Avocado")]
    pub name: Option<String>,
    #[schema(example = "Fruit")]
    pub crop_type: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    #[schema(example = "Loam")]
    pub soil_type: Option<String>,
    #[schema(example = "None")]
    pub pesticides_used: Option<String>,
    pub image_url: Option<String>,
}

impl From<CreateCropRequest> for NewCrop {
    fn from(req: CreateCropRequest) -> Self {
        NewCrop {
            name: req.name,
            crop_type: req.crop_type,
            harvest_date: req.harvest_date,
            expiry_date: req.expiry_date,
            soil_type: req.soil_type,
            pesticides_used: req.pesticides_used,
            image_url: req.image_url,
        }
    }
}

/// Request body for updating a crop. Only present fields are changed.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateCropRequest {
    pub name: Option<String>,
    pub crop_type: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub soil_type: Option<String>,
    pub pesticides_used: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateCropRequest {
    /// Merge present fields over an existing record.
    pub fn apply_to(self, crop: &mut Crop) {
        if let Some(name) = self.name {
            crop.name = name;
        }
        if let Some(crop_type) = self.crop_type {
            crop.crop_type = crop_type;
        }
        if let Some(harvest_date) = self.harvest_date {
            crop.harvest_date = harvest_date;
        }
        if let Some(expiry_date) = self.expiry_date {
            crop.expiry_date = expiry_date;
        }
        if let Some(soil_type) = self.soil_type {
            crop.soil_type = soil_type;
        }
        if let Some(pesticides_used) = self.pesticides_used {
            crop.pesticides_used = pesticides_used;
        }
        if let Some(image_url) = self.image_url {
            crop.image_url = Some(image_url);
        }
    }
}

/// Request body for acquiring a supplier's crop into the caller's inventory.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AcquireCropRequest {
    /// The supplier's 3-digit code: a farmer code when a distributor
    /// acquires, a distributor code when a retailer acquires.
    #[schema(example = "412")]
    pub supplier_id: String,
}

/// Request body for recording handling information on a held crop.
///
/// Distributors send `farmer_id`, `received_date`, `sent_to_retailer`, and
/// `retailer_location`; retailers send `distributor_id` and `received_date`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct HandoffRequest {
    #[schema(example = "412")]
    pub farmer_id: Option<String>,
    #[schema(example = "317")]
    pub distributor_id: Option<String>,
    #[schema(example = "2025-03-04")]
    pub received_date: Option<String>,
    #[schema(example = "FreshMart")]
    pub sent_to_retailer: Option<String>,
    #[schema(example = "Nairobi")]
    pub retailer_location: Option<String>,
}

impl HandoffRequest {
    pub fn received_date(&self) -> String {
        self.received_date.clone().unwrap_or_default()
    }

    pub fn require_farmer_id(&self) -> Result<&str, AppError> {
        match self.farmer_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AppError::Validation("Farmer ID is required".into())),
        }
    }

    pub fn require_distributor_id(&self) -> Result<&str, AppError> {
        match self.distributor_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(AppError::Validation("Distributor ID is required".into())),
        }
    }
}

/// A crop together with its audit trail, as returned by the public scan
/// endpoint.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ProvenanceResponse {
    pub crop: Crop,
    pub supply_chain: Vec<SupplyChainEntry>,
}
