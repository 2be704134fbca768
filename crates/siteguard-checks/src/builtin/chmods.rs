//! File and directory permission check

use siteguard_core::{
    Check, CheckContext, CheckMetadata, FixResult, Fixable, MessageCatalogue, Priority, ScanResult,
    Site,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const NAME: &str = "chmods";

const MESSAGES: &[(u16, &str)] = &[
    (0, "All files permissions are good."),
    (1, "All files permissions are fixed."),
    (100, "Unable to determine status of %s."),
    (101, "Unable to apply new file permissions to %s, the other files were fixed."),
    (200, "File permissions for %1$s should be %2$s, NOT %3$s!"),
    (201, "Unable to apply new file permissions to %s."),
];

/// Compares permission bits of strategic paths against the most permissive
/// mode each one may have.
pub struct ChmodsCheck {
    metadata: CheckMetadata,
    catalogue: MessageCatalogue,
}

impl ChmodsCheck {
    pub fn new() -> Self {
        Self {
            metadata: CheckMetadata::new(NAME, "File System", Priority::High)
                .with_title(
                    "Check if your files and folders have the correct write permissions (chmod).",
                )
                .with_description(
                    "CHMOD is the way to give read/write/execute rights to a file or a folder. \
                     The bad guy is known as 0777 and should be avoided. This test will check \
                     some strategic files and folders.",
                )
                .with_fix_description(
                    "This will change the files mode to the recommended one for each bad mode.",
                )
                .fixable(Fixable::Yes),
            catalogue: MessageCatalogue::new(MESSAGES),
        }
    }
}

impl Default for ChmodsCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Paths to inspect with their maximum allowed mode
fn file_perms(site: &dyn Site) -> Vec<(PathBuf, u32)> {
    let root = site.root().to_path_buf();
    let mut files = vec![
        (site.config_file(), 0o644),
        (root.clone(), 0o755),
        (root.join("wp-admin"), 0o755),
        (root.join("wp-includes"), 0o755),
        (site.content_dir(), 0o755),
        (site.themes_dir(), 0o755),
        (site.plugin_dir(), 0o755),
        (site.uploads_dir(), 0o755),
    ];

    if site.is_apache() {
        files.push((root.join(".htaccess"), 0o644));
    }

    files
}

/// Path relative to the site root, `/` for the root itself
fn display_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => String::from("/"),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(unix)]
fn read_mode(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
    if mode == 0 {
        return Err(io::Error::new(io::ErrorKind::Other, "no permission bits"));
    }
    Ok(mode)
}

#[cfg(unix)]
fn write_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn read_mode(_path: &Path) -> io::Result<u32> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "permission bits are not available on this platform",
    ))
}

#[cfg(not(unix))]
fn write_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "permission bits are not available on this platform",
    ))
}

impl Check for ChmodsCheck {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn catalogue(&self) -> &MessageCatalogue {
        &self.catalogue
    }

    fn scan(&self, ctx: &CheckContext) -> ScanResult {
        let mut result = ScanResult::new();
        let root = ctx.site.root();
        let mut unknown = Vec::new();

        for (path, max) in file_perms(ctx.site.as_ref()) {
            let shown = display_path(root, &path);
            match read_mode(&path) {
                Ok(mode) if mode > max => {
                    debug!("{} has mode {:04o}, max {:04o}", path.display(), mode, max);
                    result.add_message(
                        200,
                        vec![
                            shown.into(),
                            format!("{:04o}", max).into(),
                            format!("{:04o}", mode).into(),
                        ],
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Cannot read mode of {}: {}", path.display(), e);
                    unknown.push(shown);
                }
            }
        }

        if !unknown.is_empty() {
            result.add_message(100, vec![unknown.into()]);
        }

        result.maybe_set_status(0);
        result
    }

    fn fix(&self, ctx: &CheckContext) -> FixResult {
        let mut result = FixResult::new();
        let root = ctx.site.root();

        let mut attempted = Vec::new();
        for (path, max) in file_perms(ctx.site.as_ref()) {
            let needs_fix = match read_mode(&path) {
                Ok(mode) => mode > max,
                Err(_) => true,
            };
            if needs_fix {
                if let Err(e) = write_mode(&path, max) {
                    warn!("Failed to chmod {} to {:04o}: {}", path.display(), max, e);
                }
                attempted.push((path, max));
            }
        }

        if attempted.is_empty() {
            result.add_message(0, vec![]);
            return result;
        }

        let mut unknown = Vec::new();
        let mut still_bad = Vec::new();
        for (path, max) in &attempted {
            match read_mode(path) {
                Ok(mode) if mode > *max => still_bad.push(display_path(root, path)),
                Ok(_) => {}
                Err(_) => unknown.push(display_path(root, path)),
            }
        }

        if still_bad.len() == attempted.len() {
            result.add_message(201, vec![still_bad.into()]);
        } else if !still_bad.is_empty() {
            result.add_message(101, vec![still_bad.into()]);
        }

        if !unknown.is_empty() {
            result.add_message(100, vec![unknown.into()]);
        }

        result.maybe_set_fix_status(1);
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use siteguard_core::{FixStatus, MemorySite, ScanStatus};
    use std::fs;
    use std::sync::Arc;

    fn site_with_tree(apache: bool) -> (tempfile::TempDir, CheckContext) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in [
            "wp-admin",
            "wp-includes",
            "wp-content/themes",
            "wp-content/plugins/siteguard",
            "wp-content/uploads",
        ] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("wp-config.php"), "<?php").unwrap();
        fs::write(root.join(".htaccess"), "").unwrap();

        for (path, mode) in [
            (root.to_path_buf(), 0o755),
            (root.join("wp-admin"), 0o755),
            (root.join("wp-includes"), 0o755),
            (root.join("wp-content"), 0o755),
            (root.join("wp-content/themes"), 0o755),
            (root.join("wp-content/plugins/siteguard"), 0o755),
            (root.join("wp-content/uploads"), 0o755),
            (root.join("wp-config.php"), 0o644),
            (root.join(".htaccess"), 0o644),
        ] {
            write_mode(&path, mode).unwrap();
        }

        let site = MemorySite::new(root, "http://localhost").with_apache(apache);
        (dir, CheckContext::new(Arc::new(site)))
    }

    #[test]
    fn test_scan_good_tree() {
        let (_dir, ctx) = site_with_tree(true);
        let result = ChmodsCheck::new().scan(&ctx);
        assert_eq!(result.status, ScanStatus::Good);
        assert_eq!(result.messages[0].id, 0);
    }

    #[test]
    fn test_scan_reports_too_permissive() {
        let (dir, ctx) = site_with_tree(false);
        write_mode(&dir.path().join("wp-config.php"), 0o666).unwrap();

        let check = ChmodsCheck::new();
        let result = check.scan(&ctx);
        assert_eq!(result.status, ScanStatus::Bad);
        assert_eq!(
            result.render(check.catalogue()),
            vec!["File permissions for wp-config.php should be 0644, NOT 0666!"]
        );

        let again = check.scan(&ctx);
        assert_eq!(again.status, result.status);
        assert_eq!(again.messages, result.messages);
    }

    #[test]
    fn test_scan_missing_path_is_warning() {
        let (dir, ctx) = site_with_tree(false);
        fs::remove_dir_all(dir.path().join("wp-content/uploads")).unwrap();

        let check = ChmodsCheck::new();
        let result = check.scan(&ctx);
        assert_eq!(result.status, ScanStatus::Warning);
        assert_eq!(
            result.render(check.catalogue()),
            vec!["Unable to determine status of wp-content/uploads."]
        );
    }

    #[test]
    fn test_fix_restores_modes() {
        let (dir, ctx) = site_with_tree(true);
        write_mode(&dir.path().join("wp-admin"), 0o777).unwrap();
        write_mode(&dir.path().join(".htaccess"), 0o666).unwrap();

        let check = ChmodsCheck::new();
        let fix = check.fix(&ctx);
        assert_eq!(fix.status, FixStatus::Fixed);
        assert_eq!(fix.messages[0].id, 1);
        assert_eq!(read_mode(&dir.path().join("wp-admin")).unwrap(), 0o755);
        assert_eq!(check.scan(&ctx).status, ScanStatus::Good);
    }

    #[test]
    fn test_fix_with_nothing_to_do() {
        let (_dir, ctx) = site_with_tree(false);
        let fix = ChmodsCheck::new().fix(&ctx);
        assert_eq!(fix.status, FixStatus::Fixed);
        assert_eq!(fix.messages[0].id, 0);
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/srv/www");
        assert_eq!(display_path(root, root), "/");
        assert_eq!(display_path(root, &root.join("wp-admin")), "wp-admin");
        assert_eq!(display_path(root, Path::new("/etc/passwd")), "/etc/passwd");
    }
}
