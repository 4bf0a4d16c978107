use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Role;

/// Append-only audit record of a handoff event. Entries are only ever
/// written and read back in full; they are never edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SupplyChainEntry {
    pub id: Uuid,
    pub crop_id: Uuid,
    /// The participant that recorded the event.
    pub user_id: Uuid,
    pub user_role: Role,
    pub entry_date: DateTime<Utc>,
    /// Free-form event payload (supplier ids, dates, actions).
    pub details: serde_json::Value,
}

impl SupplyChainEntry {
    pub fn new(crop_id: Uuid, user_id: Uuid, user_role: Role, details: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            crop_id,
            user_id,
            user_role,
            entry_date: Utc::now(),
            details,
        }
    }
}
