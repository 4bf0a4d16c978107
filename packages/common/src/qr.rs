//! QR provenance payloads.
//!
//! A crop's QR code carries nothing but its id. Scanners in the wild emit
//! either the bare id text or a small JSON object with an `id` field, so
//! decoding accepts both forms.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum QrError {
    #[error("QR payload is empty")]
    Empty,
    #[error("QR payload has no crop id")]
    MissingId,
    #[error("QR payload does not contain a valid crop id")]
    InvalidId,
}

/// The payload text to encode into a crop's QR image.
pub fn encode_crop_id(crop_id: Uuid) -> String {
    crop_id.to_string()
}

/// Extract the crop id from a scanned payload.
///
/// Accepts a bare id string or a JSON object with an `id` field; numeric
/// ids are stringified before parsing, matching what lenient QR encoders
/// produce.
pub fn decode_payload(payload: &str) -> Result<Uuid, QrError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(QrError::Empty);
    }

    let raw = match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(map)) => match map.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(QrError::MissingId),
        },
        // Not JSON (or JSON that isn't an object): treat the whole payload
        // as the id itself.
        _ => payload.to_string(),
    };

    Uuid::parse_str(raw.trim()).map_err(|_| QrError::InvalidId)
}
