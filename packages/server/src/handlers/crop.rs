use axum::{Json, extract::{Path, State}, http::StatusCode, response::IntoResponse};
use common::{Crop, DistributorInfo, FarmerInfo, RetailerInfo, Role, SupplyChainEntry, qr};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::crop::{
    AcquireCropRequest, CreateCropRequest, HandoffRequest, ProvenanceResponse, UpdateCropRequest,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/crops",
    tag = "Crops",
    operation_id = "listCrops",
    summary = "List the caller's crops",
    description = "Returns the crops currently held by the authenticated user, newest first.",
    responses(
        (status = 200, description = "The caller's crops", body = Vec<Crop>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_crops(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Crop>>, AppError> {
    let crops = state.read_store()?.crops_for_user(auth_user.user_id);
    Ok(Json(crops))
}

#[utoipa::path(
    post,
    path = "/api/crops",
    tag = "Crops",
    operation_id = "createCrop",
    summary = "Record a new crop",
    description = "Records a crop under the caller. Farmer callers get their origin snapshot stamped onto the record.",
    request_body = CreateCropRequest,
    responses(
        (status = 201, description = "Crop recorded", body = Crop),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_crop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCropRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut store = state.write_store()?;
    let profile = store
        .find_user(auth_user.user_id)
        .map(|u| u.profile())
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut crop = store.add_crop(payload.into(), auth_user.user_id)?;

    // Farmers stamp provenance at creation time.
    if profile.role == Role::Farmer {
        crop.farmer_info = FarmerInfo::from_profile(&profile);
        crop = store.update_crop(crop)?;
    }

    Ok((StatusCode::CREATED, Json(crop)))
}

#[utoipa::path(
    get,
    path = "/api/crops/{id}",
    tag = "Crops",
    operation_id = "getCrop",
    summary = "Fetch a crop by id",
    params(("id" = Uuid, Path, description = "Crop id")),
    responses(
        (status = 200, description = "The crop", body = Crop),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such crop (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_crop(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Crop>, AppError> {
    let store = state.read_store()?;
    let crop = store
        .find_crop(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Crop not found".into()))?;
    Ok(Json(crop))
}

#[utoipa::path(
    put,
    path = "/api/crops/{id}",
    tag = "Crops",
    operation_id = "updateCrop",
    summary = "Update a crop",
    description = "Updates fields on a crop the caller holds. Only present fields change.",
    params(("id" = Uuid, Path, description = "Crop id")),
    request_body = UpdateCropRequest,
    responses(
        (status = 200, description = "Updated crop", body = Crop),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such crop for this caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn update_crop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCropRequest>,
) -> Result<Json<Crop>, AppError> {
    let mut store = state.write_store()?;
    let mut crop = find_held_crop(&store, id, auth_user.user_id)?;
    payload.apply_to(&mut crop);
    let crop = store.update_crop(crop)?;
    Ok(Json(crop))
}

#[utoipa::path(
    delete,
    path = "/api/crops/{id}",
    tag = "Crops",
    operation_id = "deleteCrop",
    summary = "Delete a crop",
    params(("id" = Uuid, Path, description = "Crop id")),
    responses(
        (status = 204, description = "Crop deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such crop for this caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_crop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut store = state.write_store()?;
    find_held_crop(&store, id, auth_user.user_id)?;
    store.delete_crop(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/crops/farmer/{farmer_id}",
    tag = "Crops",
    operation_id = "cropsByFarmer",
    summary = "List crops under a farmer's 3-digit code",
    params(("farmer_id" = String, Path, description = "3-digit farmer code")),
    responses(
        (status = 200, description = "The farmer's listed crops", body = Vec<Crop>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown farmer code (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn crops_by_farmer(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(farmer_id): Path<String>,
) -> Result<Json<Vec<Crop>>, AppError> {
    let store = state.read_store()?;
    if store.find_farmer_by_code(&farmer_id).is_none() {
        return Err(AppError::NotFound("Farmer not found".into()));
    }
    Ok(Json(store.crops_by_farmer_code(&farmer_id)))
}

#[utoipa::path(
    get,
    path = "/api/crops/distributor/{distributor_id}",
    tag = "Crops",
    operation_id = "cropsByDistributor",
    summary = "List crops under a distributor's 3-digit code",
    params(("distributor_id" = String, Path, description = "3-digit distributor code")),
    responses(
        (status = 200, description = "The distributor's listed crops", body = Vec<Crop>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown distributor code (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn crops_by_distributor(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(distributor_id): Path<String>,
) -> Result<Json<Vec<Crop>>, AppError> {
    let store = state.read_store()?;
    if store.find_distributor_by_code(&distributor_id).is_none() {
        return Err(AppError::NotFound("Distributor not found".into()));
    }
    Ok(Json(store.crops_by_distributor_code(&distributor_id)))
}

#[utoipa::path(
    get,
    path = "/api/crops/scan/{payload}",
    tag = "Crops",
    operation_id = "scanCrop",
    summary = "Resolve a scanned QR payload",
    description = "Public provenance lookup. Accepts a bare crop id or a JSON object with an `id` field, exactly as QR scanners emit them.",
    params(("payload" = String, Path, description = "Scanned QR payload")),
    responses(
        (status = 200, description = "The crop and its audit trail", body = ProvenanceResponse),
        (status = 400, description = "Malformed QR payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No such crop (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn scan_crop(
    State(state): State<AppState>,
    Path(payload): Path<String>,
) -> Result<Json<ProvenanceResponse>, AppError> {
    let crop_id = qr::decode_payload(&payload).map_err(|e| AppError::Validation(e.to_string()))?;

    let store = state.read_store()?;
    let crop = store
        .find_crop(crop_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Crop not found".into()))?;
    let supply_chain = store.entries_for_crop(crop_id);

    Ok(Json(ProvenanceResponse { crop, supply_chain }))
}

#[utoipa::path(
    post,
    path = "/api/crops/{id}/acquire",
    tag = "Supply Chain",
    operation_id = "acquireCrop",
    summary = "Copy a supplier's crop into the caller's inventory",
    description = "Distributors acquire from a farmer code, retailers from a distributor code. The crop is copied under the caller with provenance snapshots embedded; the supplier's record is untouched.",
    params(("id" = Uuid, Path, description = "The supplier's crop id")),
    request_body = AcquireCropRequest,
    responses(
        (status = 201, description = "The caller's new copy", body = Crop),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller role cannot acquire (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown supplier code or crop (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn acquire_crop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<AcquireCropRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_any_role(&[Role::Distributor, Role::Retailer])?;

    let supplier_id = payload.supplier_id.trim();
    let mut store = state.write_store()?;
    let buyer = store
        .find_user(auth_user.user_id)
        .map(|u| u.profile())
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    // Resolve the supplier and check the crop is actually listed under
    // their code.
    let (supplier_profile, listed) = match auth_user.role {
        Role::Distributor => {
            let farmer = store
                .find_farmer_by_code(supplier_id)
                .map(|u| u.profile())
                .ok_or_else(|| AppError::NotFound("Farmer not found".into()))?;
            (farmer, store.crops_by_farmer_code(supplier_id))
        }
        _ => {
            let distributor = store
                .find_distributor_by_code(supplier_id)
                .map(|u| u.profile())
                .ok_or_else(|| AppError::NotFound("Distributor not found".into()))?;
            (distributor, store.crops_by_distributor_code(supplier_id))
        }
    };

    let crop = listed
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound("Crop not found".into()))?;

    let mut copy = crop.copied_to(&buyer);
    if auth_user.role == Role::Distributor {
        copy.farmer_info = FarmerInfo::from_profile(&supplier_profile);
    }
    let copy = store.insert_crop(copy)?;

    store.add_entry(SupplyChainEntry::new(
        copy.id,
        auth_user.user_id,
        auth_user.role,
        json!({
            "action": "acquired",
            "supplier_id": supplier_id,
            "source_crop_id": crop.id,
        }),
    ))?;

    Ok((StatusCode::CREATED, Json(copy)))
}

#[utoipa::path(
    post,
    path = "/api/crops/{id}/handoff",
    tag = "Supply Chain",
    operation_id = "handoffCrop",
    summary = "Record handling information on a held crop",
    description = "Distributors record receipt from a farmer and dispatch to a retailer; retailers record receipt from a distributor. Stamps the matching snapshot and appends an audit entry.",
    params(("id" = Uuid, Path, description = "Crop id")),
    request_body = HandoffRequest,
    responses(
        (status = 200, description = "Updated crop", body = Crop),
        (status = 400, description = "Missing or invalid supplier code (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller role cannot record handoffs (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No such crop for this caller (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn handoff_crop(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<HandoffRequest>,
) -> Result<Json<Crop>, AppError> {
    auth_user.require_any_role(&[Role::Distributor, Role::Retailer])?;

    let mut store = state.write_store()?;
    let holder = store
        .find_user(auth_user.user_id)
        .map(|u| u.profile())
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let mut crop = find_held_crop(&store, id, auth_user.user_id)?;

    let details = match auth_user.role {
        Role::Distributor => {
            let farmer_id = payload.require_farmer_id()?;
            let farmer = store
                .find_farmer_by_code(farmer_id)
                .map(|u| u.profile())
                .ok_or_else(|| {
                    AppError::Validation("Invalid farmer ID. Please check and try again.".into())
                })?;

            crop.farmer_info = FarmerInfo::from_profile(&farmer);
            crop.distributor_info = Some(DistributorInfo {
                name: holder.display_name(),
                location: holder.display_location(),
                received_date: payload.received_date(),
                sent_to_retailer: payload.sent_to_retailer.clone().unwrap_or_default(),
                retailer_location: payload.retailer_location.clone().unwrap_or_default(),
            });

            json!({
                "farmer_id": farmer_id,
                "received_date": payload.received_date(),
                "sent_to_retailer": payload.sent_to_retailer,
                "retailer_location": payload.retailer_location,
            })
        }
        _ => {
            let distributor_id = payload.require_distributor_id()?;
            let distributor = store
                .find_distributor_by_code(distributor_id)
                .map(|u| u.profile())
                .ok_or_else(|| {
                    AppError::Validation(
                        "Invalid distributor ID. Please check and try again.".into(),
                    )
                })?;

            crop.retailer_info = Some(RetailerInfo {
                name: holder.display_name(),
                location: holder.display_location(),
                received_date: payload.received_date(),
                received_from_distributor: distributor.display_name(),
                distributor_location: distributor.display_location(),
            });

            json!({
                "distributor_id": distributor_id,
                "received_date": payload.received_date(),
                "action": "received_from_distributor",
            })
        }
    };

    let crop = store.update_crop(crop)?;
    store.add_entry(SupplyChainEntry::new(
        crop.id,
        auth_user.user_id,
        auth_user.role,
        details,
    ))?;

    Ok(Json(crop))
}

#[utoipa::path(
    get,
    path = "/api/crops/{id}/trace",
    tag = "Supply Chain",
    operation_id = "traceCrop",
    summary = "The crop's append-only audit trail",
    params(("id" = Uuid, Path, description = "Crop id")),
    responses(
        (status = 200, description = "Audit entries in insertion order", body = Vec<SupplyChainEntry>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such crop (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn trace_crop(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SupplyChainEntry>>, AppError> {
    let store = state.read_store()?;
    if store.find_crop(id).is_none() {
        return Err(AppError::NotFound("Crop not found".into()));
    }
    Ok(Json(store.entries_for_crop(id)))
}

/// Look up a crop held by `user_id`, returning 404 when it does not exist
/// or belongs to someone else (ownership is not leaked).
fn find_held_crop(store: &store::Store, id: Uuid, user_id: Uuid) -> Result<Crop, AppError> {
    store
        .find_crop(id)
        .filter(|c| c.user_id == user_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Crop not found".into()))
}
