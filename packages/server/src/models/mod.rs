pub mod auth;
pub mod crop;
pub mod insights;
