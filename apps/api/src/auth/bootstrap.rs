//! First-start admin provisioning from `ADMIN_USERNAME` / `ADMIN_PASSWORD`.
//!
//! The seeded account is created when missing. When it exists but the
//! configured password no longer verifies, or the email changed, the stored
//! credentials are rotated to match the environment.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::auth::admins::{find_admin_by_username, insert_admin, update_admin_credentials};
use crate::auth::password::{hash_password, verify_password};
use crate::config::AdminSeed;
use crate::models::admin::AdminRow;

pub async fn ensure_admin(pool: &PgPool, seed: &AdminSeed) -> Result<()> {
    let Some(existing) = find_admin_by_username(pool, &seed.username).await? else {
        let hash = hash_off_thread(&seed.password).await?;
        if insert_admin(pool, &seed.username, &seed.email, &hash).await? {
            info!("Created admin '{}'", seed.username);
        }
        return Ok(());
    };

    let check_seed = seed.clone();
    let stale = tokio::task::spawn_blocking(move || credentials_stale(&existing, &check_seed))
        .await
        .context("password check task panicked")?;
    if !stale {
        info!("Admin '{}' already up to date", seed.username);
        return Ok(());
    }

    let hash = hash_off_thread(&seed.password).await?;
    update_admin_credentials(pool, &seed.username, &seed.email, &hash).await?;
    info!("Rotated credentials for admin '{}'", seed.username);
    Ok(())
}

/// Whether the stored account differs from the configured seed.
fn credentials_stale(existing: &AdminRow, seed: &AdminSeed) -> bool {
    existing.email != seed.email || !verify_password(&seed.password, &existing.password_hash)
}

async fn hash_off_thread(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task panicked")?
        .map_err(|e| anyhow::anyhow!("failed to hash admin password: {e}"))
}
