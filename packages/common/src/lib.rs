//! Shared domain model for the FarmChainX supply-chain tracker.
//!
//! Everything that both the server and the CLI client need to agree on
//! lives here: users and roles, crop records with their by-value handoff
//! snapshots, append-only supply-chain entries, the QR payload codec, and
//! the placeholder insight generators.

pub mod crop;
pub mod insights;
pub mod qr;
pub mod supply_chain;
pub mod user;

pub use crop::{Crop, DistributorInfo, FarmerInfo, RetailerInfo};
pub use supply_chain::SupplyChainEntry;
pub use user::{Role, User, UserProfile};
