use crate::config::AdminSeedConfig;
use crate::db::users::UserStore;
use crate::error::CatalogError;
use tracing::{info, warn};

/// What the startup seed did to the administrator account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(i64),
    PasswordReset(i64),
    LeftUnchanged(i64),
}

/// Ensure the configured administrator exists.
///
/// An existing account keeps its current password unless `reset_password_on_start` is set,
/// so a password changed after first boot survives restarts.
pub async fn seed_admin(
    users: &UserStore,
    cfg: &AdminSeedConfig,
) -> Result<SeedOutcome, CatalogError> {
    let username = cfg.username.trim();
    if username.is_empty() {
        return Err(CatalogError::Validation("admin username must not be empty".into()));
    }

    let outcome = match users.find_by_username(username).await? {
        Some(existing) if !cfg.reset_password_on_start => SeedOutcome::LeftUnchanged(existing.id),
        Some(_) => SeedOutcome::PasswordReset(users.upsert_admin(username, &cfg.password).await?),
        None => SeedOutcome::Created(users.upsert_admin(username, &cfg.password).await?),
    };

    match outcome {
        SeedOutcome::Created(id) => info!(user_id = id, username, "admin user created"),
        SeedOutcome::PasswordReset(id) => {
            warn!(user_id = id, username, "admin password reset from configuration")
        }
        SeedOutcome::LeftUnchanged(id) => {
            info!(user_id = id, username, "admin user exists; password left unchanged")
        }
    }
    if cfg.password == AdminSeedConfig::default().password
        && !matches!(outcome, SeedOutcome::LeftUnchanged(_))
    {
        warn!(username, "admin password is the built-in default; set CATALOG_ADMIN__PASSWORD");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_support::temp_pool;

    fn seed_cfg(password: &str, reset: bool) -> AdminSeedConfig {
        AdminSeedConfig {
            username: "admin".into(),
            password: password.into(),
            reset_password_on_start: reset,
        }
    }

    #[tokio::test]
    async fn repeated_seeding_keeps_a_changed_password() {
        let (_dir, pool) = temp_pool().await;
        let users = UserStore::new(pool);

        let created = seed_admin(&users, &seed_cfg("123", false)).await.unwrap();
        let SeedOutcome::Created(id) = created else {
            panic!("expected Created, got {created:?}");
        };

        users.upsert_admin("admin", "changed").await.unwrap();
        let again = seed_admin(&users, &seed_cfg("123", false)).await.unwrap();
        assert_eq!(again, SeedOutcome::LeftUnchanged(id));
        assert!(users.verify_credentials("admin", "changed").await.unwrap().is_some());
        assert!(users.verify_credentials("admin", "123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_flag_overwrites_the_password() {
        let (_dir, pool) = temp_pool().await;
        let users = UserStore::new(pool);
        seed_admin(&users, &seed_cfg("first", false)).await.unwrap();

        let outcome = seed_admin(&users, &seed_cfg("second", true)).await.unwrap();
        assert!(matches!(outcome, SeedOutcome::PasswordReset(_)));
        assert!(users.verify_credentials("admin", "second").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blank_username_is_refused() {
        let (_dir, pool) = temp_pool().await;
        let users = UserStore::new(pool);
        let cfg = AdminSeedConfig { username: "  ".into(), ..AdminSeedConfig::default() };
        assert!(seed_admin(&users, &cfg).await.is_err());
    }
}
