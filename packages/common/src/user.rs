use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supply-chain participant roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Distributor,
    Retailer,
    Consumer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Distributor => "distributor",
            Role::Retailer => "retailer",
            Role::Consumer => "consumer",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Role::Farmer),
            "distributor" => Ok(Role::Distributor),
            "retailer" => Ok(Role::Retailer),
            "consumer" => Ok(Role::Consumer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account record. The password is kept as an argon2 hash, never
/// plaintext.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// 3-digit lookup code, present only for farmers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    /// 3-digit lookup code, present only for distributors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            farmer_id: self.farmer_id.clone(),
            distributor_id: self.distributor_id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            created_at: self.created_at,
        }
    }

    /// Display name shown in handoff snapshots: the profile name, or the
    /// email when no name was given.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.email.clone())
    }

    /// Location shown in handoff snapshots.
    pub fn display_location(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| "Location not specified".to_string())
    }
}

/// Public view of a user: everything except the credential hash. This is
/// what API responses carry and what the client persists as its session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    #[schema(example = "alice@greenfields.example")]
    pub email: String,
    pub role: Role,
    /// 3-digit farmer lookup code.
    #[schema(example = "412")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    /// 3-digit distributor lookup code.
    #[schema(example = "317")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_id: Option<String>,
    #[schema(example = "Alice Mburu")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[schema(example = "Nakuru")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.email.clone())
    }

    pub fn display_location(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| "Location not specified".to_string())
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        user.profile()
    }
}
