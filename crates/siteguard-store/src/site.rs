//! Site whose settings and users live in the option store

use crate::database::Database;
use siteguard_core::site::submodule_key;
use siteguard_core::{Error, Result, Site};
use std::path::{Path, PathBuf};
use tracing::info;

const SUBMODULES_KEY: &str = "active_submodules";
const USERS_KEY: &str = "users";

/// Filesystem-rooted site with durable submodule and user settings
pub struct StoreSite {
    db: Database,
    root: PathBuf,
    home_url: String,
    apache: bool,
    plugin_slug: String,
}

impl StoreSite {
    pub fn new(db: Database, root: impl Into<PathBuf>, home_url: impl Into<String>) -> Self {
        Self {
            db,
            root: root.into(),
            home_url: home_url.into().trim_end_matches('/').to_string(),
            apache: false,
            plugin_slug: String::from("siteguard"),
        }
    }

    pub fn with_apache(mut self, apache: bool) -> Self {
        self.apache = apache;
        self
    }

    pub fn with_plugin_slug(mut self, slug: impl Into<String>) -> Self {
        self.plugin_slug = slug.into();
        self
    }

    /// Seed the user list while the store holds none; a non-empty list is
    /// left untouched
    pub fn seed_users(&self, logins: &[String]) -> Result<()> {
        if logins.is_empty() {
            return Ok(());
        }
        let stored: Vec<String> = self.db.get(USERS_KEY)?.unwrap_or_default();
        if stored.is_empty() {
            self.db.set(USERS_KEY, &logins)?;
            info!("Seeded {} user(s)", logins.len());
        }
        Ok(())
    }
}

impl Site for StoreSite {
    fn root(&self) -> &Path {
        &self.root
    }

    fn home_url(&self) -> &str {
        &self.home_url
    }

    fn is_apache(&self) -> bool {
        self.apache
    }

    fn plugin_slug(&self) -> &str {
        &self.plugin_slug
    }

    fn is_submodule_active(&self, module: &str, submodule: &str) -> Result<bool> {
        let active: Vec<String> = self.db.get(SUBMODULES_KEY)?.unwrap_or_default();
        Ok(active.contains(&submodule_key(module, submodule)))
    }

    fn activate_submodule(&self, module: &str, submodule: &str) -> Result<()> {
        let key = submodule_key(module, submodule);
        self.db.update(SUBMODULES_KEY, |active: &mut Vec<String>| {
            if !active.contains(&key) {
                active.push(key.clone());
            }
        })?;
        info!("Activated submodule {}", key);
        Ok(())
    }

    fn user_logins(&self) -> Result<Vec<String>> {
        Ok(self.db.get(USERS_KEY)?.unwrap_or_default())
    }

    fn rename_user(&self, old_login: &str, new_login: &str) -> Result<()> {
        let mut users: Vec<String> = self.db.get(USERS_KEY)?.unwrap_or_default();
        let login = users
            .iter_mut()
            .find(|login| login.as_str() == old_login)
            .ok_or_else(|| Error::InvalidInput {
                field: "login".into(),
                message: format!("no user with login '{}'", old_login),
            })?;
        *login = new_login.to_string();
        self.db.set(USERS_KEY, &users)?;
        info!("Renamed user {} to {}", old_login, new_login);
        Ok(())
    }
}
