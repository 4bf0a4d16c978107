use anyhow::{Result, anyhow, bail};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use common::Role;
use console::style;
use dialoguer::Password;
use serde_json::json;
use store::NewUser;
use tracing::debug;

use crate::api::ApiError;
use crate::commands::{Ctx, remote_or, require_local_user};
use crate::output;

pub fn sign_up(
    ctx: &mut Ctx,
    email: &str,
    role: &str,
    name: Option<String>,
    location: Option<String>,
) -> Result<()> {
    let parsed_role: Role = role.parse().map_err(|e: String| anyhow!(e))?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    if password.len() < 8 || password.len() > 128 {
        bail!("Password must be 8-128 characters");
    }

    let body = json!({
        "email": email,
        "password": password,
        "role": role,
        "name": name,
        "location": location,
    });

    match ctx.api.sign_up(&body) {
        Ok(res) => {
            ctx.config.token = Some(res.token);
            ctx.save_config()?;
            ctx.open_store()?.set_current_user(res.user.clone())?;
            println!("{}", style("Account created.").green());
            output::profile(&res.user);
        }
        Err(ApiError::Network(err)) => {
            debug!("API unreachable, signing up locally: {}", err);
            let mut store = ctx.open_store()?;
            let user = store.add_user(NewUser {
                email: email.to_string(),
                password_hash: hash_password(&password)?,
                role: parsed_role,
                name,
                location,
            })?;
            store.set_current_user(user.profile())?;
            println!("{}", style("Account created (offline).").green());
            output::profile(&user.profile());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub fn sign_in(ctx: &mut Ctx, email: &str) -> Result<()> {
    let password = Password::new().with_prompt("Password").interact()?;
    let body = json!({ "email": email, "password": password });

    match ctx.api.sign_in(&body) {
        Ok(res) => {
            ctx.config.token = Some(res.token);
            ctx.save_config()?;
            ctx.open_store()?.set_current_user(res.user.clone())?;
            println!("{}", style("Signed in.").green());
            output::profile(&res.user);
        }
        Err(ApiError::Network(err)) => {
            debug!("API unreachable, signing in locally: {}", err);
            let mut store = ctx.open_store()?;
            let user = store
                .find_user_by_email(email)
                .cloned()
                .filter(|u| verify_password(&password, &u.password_hash))
                .ok_or_else(|| anyhow!("Invalid email or password"))?;
            store.set_current_user(user.profile())?;
            ctx.config.token = None;
            ctx.save_config()?;
            println!("{}", style("Signed in (offline).").green());
            output::profile(&user.profile());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub fn sign_out(ctx: &mut Ctx) -> Result<()> {
    ctx.config.token = None;
    ctx.save_config()?;
    ctx.open_store()?.clear_current_user()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(ctx: &Ctx) -> Result<()> {
    let local = || {
        let store = ctx.open_store()?;
        require_local_user(&store)
    };
    // Without a token the API can only say 401; the local session is the
    // source of truth for offline accounts.
    let user = if ctx.config.token.is_some() {
        remote_or(|| ctx.api.me(), local)?
    } else {
        local()?
    };
    output::profile(&user);
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow!("Password hash error: {}", e))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
