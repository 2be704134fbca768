//! The site environment checks read from and remediate

use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Access to the audited site: its files, settings and users.
///
/// Implementations use interior mutability; a single instance is shared by
/// every check of a run.
pub trait Site: Send + Sync {
    /// Installation root directory
    fn root(&self) -> &Path;

    /// Public home URL, without trailing slash
    fn home_url(&self) -> &str;

    /// Whether the site is served by Apache (and honors `.htaccess`)
    fn is_apache(&self) -> bool;

    /// Directory name of this plugin under the plugins directory
    fn plugin_slug(&self) -> &str {
        "siteguard"
    }

    fn config_file(&self) -> PathBuf {
        self.root().join("wp-config.php")
    }

    fn content_dir(&self) -> PathBuf {
        self.root().join("wp-content")
    }

    fn themes_dir(&self) -> PathBuf {
        self.content_dir().join("themes")
    }

    fn plugin_dir(&self) -> PathBuf {
        self.content_dir().join("plugins").join(self.plugin_slug())
    }

    fn uploads_dir(&self) -> PathBuf {
        self.content_dir().join("uploads")
    }

    /// Whether a protection submodule (e.g. `users-login/nonlogintimeslot`) is on
    fn is_submodule_active(&self, module: &str, submodule: &str) -> Result<bool>;

    fn activate_submodule(&self, module: &str, submodule: &str) -> Result<()>;

    /// Logins of all registered users
    fn user_logins(&self) -> Result<Vec<String>>;

    fn rename_user(&self, old_login: &str, new_login: &str) -> Result<()>;
}

/// Key under which a submodule's activation is recorded
pub fn submodule_key(module: &str, submodule: &str) -> String {
    format!("{}/{}", module, submodule)
}

/// In-memory site, for embedding and tests
#[derive(Debug)]
pub struct MemorySite {
    root: PathBuf,
    home_url: String,
    apache: bool,
    submodules: Mutex<HashSet<String>>,
    users: Mutex<Vec<String>>,
}

impl MemorySite {
    pub fn new(root: impl Into<PathBuf>, home_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            home_url: home_url.into().trim_end_matches('/').to_string(),
            apache: false,
            submodules: Mutex::new(HashSet::new()),
            users: Mutex::new(Vec::new()),
        }
    }

    pub fn with_apache(mut self, apache: bool) -> Self {
        self.apache = apache;
        self
    }

    pub fn with_submodule(self, module: &str, submodule: &str) -> Self {
        self.submodules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(submodule_key(module, submodule));
        self
    }

    pub fn with_user(self, login: impl Into<String>) -> Self {
        self.users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(login.into());
        self
    }
}

impl Site for MemorySite {
    fn root(&self) -> &Path {
        &self.root
    }

    fn home_url(&self) -> &str {
        &self.home_url
    }

    fn is_apache(&self) -> bool {
        self.apache
    }

    fn is_submodule_active(&self, module: &str, submodule: &str) -> Result<bool> {
        let active = self.submodules.lock().unwrap_or_else(|e| e.into_inner());
        Ok(active.contains(&submodule_key(module, submodule)))
    }

    fn activate_submodule(&self, module: &str, submodule: &str) -> Result<()> {
        self.submodules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(submodule_key(module, submodule));
        Ok(())
    }

    fn user_logins(&self) -> Result<Vec<String>> {
        Ok(self.users.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn rename_user(&self, old_login: &str, new_login: &str) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        match users.iter_mut().find(|login| login.as_str() == old_login) {
            Some(login) => {
                *login = new_login.to_string();
                Ok(())
            }
            None => Err(crate::Error::InvalidInput {
                field: "login".into(),
                message: format!("no user with login '{}'", old_login),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_root() {
        let site = MemorySite::new("/srv/www", "https://example.com/");
        assert_eq!(site.home_url(), "https://example.com");
        assert_eq!(site.config_file(), PathBuf::from("/srv/www/wp-config.php"));
        assert_eq!(
            site.plugin_dir(),
            PathBuf::from("/srv/www/wp-content/plugins/siteguard")
        );
    }

    #[test]
    fn test_submodules_and_users() {
        let site = MemorySite::new("/srv/www", "https://example.com").with_user("admin");
        assert!(!site.is_submodule_active("users-login", "nonlogintimeslot").unwrap());
        site.activate_submodule("users-login", "nonlogintimeslot").unwrap();
        assert!(site.is_submodule_active("users-login", "nonlogintimeslot").unwrap());

        site.rename_user("admin", "jane").unwrap();
        assert_eq!(site.user_logins().unwrap(), vec!["jane".to_string()]);
        assert!(site.rename_user("ghost", "x").is_err());
    }
}
