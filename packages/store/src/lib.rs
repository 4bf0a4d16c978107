//! The FarmChainX data store.
//!
//! One in-memory document holding `users`, `crops`, `supply_chain`, and the
//! client session (`currentUser`), serialized in full to a single JSON file
//! after every mutation. This is the system of record for the CLI's offline
//! path and the backing store of the REST server; both see the exact same
//! document shape the original client kept under its one localStorage key.
//!
//! Every mutating operation persists the whole blob before returning, and
//! persistence failures propagate to the caller instead of being dropped.

mod error;

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{Crop, Role, SupplyChainEntry, User, UserProfile};

pub use error::StoreError;

/// The persisted document. Field names match the wire format documented
/// for the original client's storage blob.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub users: Vec<User>,
    pub crops: Vec<Crop>,
    pub supply_chain: Vec<SupplyChainEntry>,
    #[serde(rename = "currentUser")]
    pub current_user: Option<UserProfile>,
}

/// Input for creating a user. The credential arrives pre-hashed; the store
/// never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Input for recording a crop. Blank or missing fields get the documented
/// defaults at insert time.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewCrop {
    pub name: Option<String>,
    pub crop_type: Option<String>,
    pub harvest_date: Option<chrono::NaiveDate>,
    pub expiry_date: Option<chrono::NaiveDate>,
    pub soil_type: Option<String>,
    pub pesticides_used: Option<String>,
    pub image_url: Option<String>,
}

fn non_blank(value: Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => default.to_string(),
    }
}

pub struct Store {
    data: StoreData,
    path: Option<PathBuf>,
}

impl Store {
    /// Open the store backed by `path`. A missing file starts empty; a
    /// corrupt file is preserved at `<path>.corrupt` and the store starts
    /// empty rather than silently discarding the blob.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(err) => {
                    let backup = corrupt_backup_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        %err,
                        "Store file is corrupt; preserving it and starting empty"
                    );
                    std::fs::rename(&path, &backup)?;
                    StoreData::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            data,
            path: Some(path),
        })
    }

    /// An unpersisted store, for tests and ephemeral use.
    pub fn in_memory() -> Self {
        Self {
            data: StoreData::default(),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let blob = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, blob)?;
        Ok(())
    }

    // ---- Users ----

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn user_exists(&self, email: &str) -> bool {
        self.data
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.data
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn find_user(&self, id: Uuid) -> Option<&User> {
        self.data.users.iter().find(|u| u.id == id)
    }

    /// Create a user, assigning a fresh 3-digit code when the role calls
    /// for one.
    pub fn add_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        if self.user_exists(&new.email) {
            return Err(StoreError::EmailTaken);
        }

        let farmer_id = match new.role {
            Role::Farmer => Some(self.generate_farmer_id()?),
            _ => None,
        };
        let distributor_id = match new.role {
            Role::Distributor => Some(self.generate_distributor_id()?),
            _ => None,
        };

        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            farmer_id,
            distributor_id,
            name: new.name,
            location: new.location,
            created_at: Utc::now(),
        };
        self.data.users.push(user.clone());
        self.persist()?;
        Ok(user)
    }

    /// Replace a user record in place. Crop snapshots taken earlier are
    /// unaffected; they were copied by value.
    pub fn update_user(&mut self, user: User) -> Result<User, StoreError> {
        let slot = self
            .data
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StoreError::NotFound("User"))?;
        *slot = user.clone();
        self.persist()?;
        Ok(user)
    }

    pub fn find_farmer_by_code(&self, farmer_id: &str) -> Option<&User> {
        self.data
            .users
            .iter()
            .find(|u| u.role == Role::Farmer && u.farmer_id.as_deref() == Some(farmer_id))
    }

    pub fn find_distributor_by_code(&self, distributor_id: &str) -> Option<&User> {
        self.data
            .users
            .iter()
            .find(|u| u.role == Role::Distributor && u.distributor_id.as_deref() == Some(distributor_id))
    }

    /// Rejection-sample an unused 3-digit farmer code (100-999).
    fn generate_farmer_id(&self) -> Result<String, StoreError> {
        let taken: Vec<&str> = self
            .data
            .users
            .iter()
            .filter(|u| u.role == Role::Farmer)
            .filter_map(|u| u.farmer_id.as_deref())
            .collect();
        sample_code(&taken).ok_or(StoreError::IdSpaceExhausted("farmer"))
    }

    /// Rejection-sample an unused 3-digit distributor code (100-999).
    fn generate_distributor_id(&self) -> Result<String, StoreError> {
        let taken: Vec<&str> = self
            .data
            .users
            .iter()
            .filter(|u| u.role == Role::Distributor)
            .filter_map(|u| u.distributor_id.as_deref())
            .collect();
        sample_code(&taken).ok_or(StoreError::IdSpaceExhausted("distributor"))
    }

    // ---- Session ----

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.data.current_user.as_ref()
    }

    pub fn set_current_user(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        self.data.current_user = Some(profile);
        self.persist()
    }

    pub fn clear_current_user(&mut self) -> Result<(), StoreError> {
        self.data.current_user = None;
        self.persist()
    }

    // ---- Crops ----

    /// Record a new crop for `owner`, filling defaults for blank fields.
    pub fn add_crop(&mut self, new: NewCrop, owner: Uuid) -> Result<Crop, StoreError> {
        let today = Utc::now().date_naive();
        let crop = Crop {
            id: Uuid::new_v4(),
            name: non_blank(new.name, "Unnamed Crop"),
            crop_type: non_blank(new.crop_type, "Unknown"),
            harvest_date: new.harvest_date.unwrap_or(today),
            expiry_date: new.expiry_date.unwrap_or(today + Duration::days(30)),
            soil_type: non_blank(new.soil_type, "Unknown"),
            pesticides_used: non_blank(new.pesticides_used, "Not specified"),
            image_url: new.image_url,
            user_id: owner,
            created_at: Utc::now(),
            farmer_info: None,
            distributor_info: None,
            retailer_info: None,
        };
        self.data.crops.push(crop.clone());
        self.persist()?;
        Ok(crop)
    }

    /// Insert a fully-formed crop record, as produced by an acquire copy.
    pub fn insert_crop(&mut self, crop: Crop) -> Result<Crop, StoreError> {
        self.data.crops.push(crop.clone());
        self.persist()?;
        Ok(crop)
    }

    pub fn find_crop(&self, id: Uuid) -> Option<&Crop> {
        self.data.crops.iter().find(|c| c.id == id)
    }

    /// Replace a crop record, matched by id.
    pub fn update_crop(&mut self, crop: Crop) -> Result<Crop, StoreError> {
        let slot = self
            .data
            .crops
            .iter_mut()
            .find(|c| c.id == crop.id)
            .ok_or(StoreError::NotFound("Crop"))?;
        *slot = crop.clone();
        self.persist()?;
        Ok(crop)
    }

    pub fn delete_crop(&mut self, id: Uuid) -> Result<(), StoreError> {
        let before = self.data.crops.len();
        self.data.crops.retain(|c| c.id != id);
        if self.data.crops.len() == before {
            return Err(StoreError::NotFound("Crop"));
        }
        self.persist()
    }

    /// The crops a user currently holds, newest first.
    pub fn crops_for_user(&self, user_id: Uuid) -> Vec<Crop> {
        let mut crops: Vec<Crop> = self
            .data
            .crops
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        crops.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        crops
    }

    /// Crops listed under a farmer's 3-digit code: the farmer's own rows
    /// plus any copy carrying that code in its origin snapshot.
    pub fn crops_by_farmer_code(&self, farmer_id: &str) -> Vec<Crop> {
        let Some(farmer) = self.find_farmer_by_code(farmer_id) else {
            return Vec::new();
        };
        self.data
            .crops
            .iter()
            .filter(|c| {
                c.user_id == farmer.id
                    || c.farmer_info
                        .as_ref()
                        .is_some_and(|info| info.farmer_id == farmer_id)
            })
            .cloned()
            .collect()
    }

    /// Crops listed under a distributor's 3-digit code. Snapshot matching
    /// is by distributor name; the snapshot does not carry the code.
    pub fn crops_by_distributor_code(&self, distributor_id: &str) -> Vec<Crop> {
        let Some(distributor) = self.find_distributor_by_code(distributor_id) else {
            return Vec::new();
        };
        let distributor_name = distributor.display_name();
        self.data
            .crops
            .iter()
            .filter(|c| {
                c.user_id == distributor.id
                    || c.distributor_info
                        .as_ref()
                        .is_some_and(|info| info.name == distributor_name)
            })
            .cloned()
            .collect()
    }

    // ---- Supply chain ----

    pub fn add_entry(&mut self, entry: SupplyChainEntry) -> Result<SupplyChainEntry, StoreError> {
        self.data.supply_chain.push(entry.clone());
        self.persist()?;
        Ok(entry)
    }

    pub fn entries_for_crop(&self, crop_id: Uuid) -> Vec<SupplyChainEntry> {
        self.data
            .supply_chain
            .iter()
            .filter(|e| e.crop_id == crop_id)
            .cloned()
            .collect()
    }

    // ---- Export / import ----

    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replace the whole document with an exported blob.
    pub fn import_json(&mut self, blob: &str) -> Result<(), StoreError> {
        self.data = serde_json::from_str(blob)?;
        self.persist()
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".corrupt");
    PathBuf::from(os)
}

/// Draw a random unused 3-digit code, or `None` when all 900 are taken.
fn sample_code(taken: &[&str]) -> Option<String> {
    if taken.len() >= 900 {
        return None;
    }
    let mut rng = rand::rng();
    loop {
        let code = rng.random_range(100..1000).to_string();
        if !taken.contains(&code.as_str()) {
            return Some(code);
        }
    }
}
