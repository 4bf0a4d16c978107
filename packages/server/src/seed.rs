use common::Role;
use store::{NewUser, Store};
use tracing::info;

use crate::config::SeedConfig;
use crate::utils::hash;

/// Create the configured admin account if it does not exist yet.
pub fn seed_admin(store: &mut Store, config: &SeedConfig) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    if store.user_exists(email) {
        return Ok(());
    }

    let password_hash =
        hash::hash_password(password).map_err(|e| anyhow::anyhow!("Password hash error: {}", e))?;

    store.add_user(NewUser {
        email: email.clone(),
        password_hash,
        role: Role::Admin,
        name: Some("Administrator".to_string()),
        location: None,
    })?;

    info!(email, "Seeded admin account");
    Ok(())
}
