//! Forbidden user logins check
//!
//! Renaming a user needs a new login that only a human can choose, so the
//! fix runs in two steps: `fix()` asks for one field per offending login and
//! `manual_fix()` applies the submitted values.

use siteguard_core::{
    Check, CheckContext, CheckMetadata, FieldKind, FixAction, FixActionRequest, FixResult,
    Fixable, FormField, MessageCatalogue, Priority, ScanResult,
};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

pub const NAME: &str = "bad_usernames";

/// Prefix of the form field carrying the new login for an offending one
pub const FIELD_PREFIX: &str = "new_login_";

/// Logins refused unless the configuration provides its own list
pub const DEFAULT_FORBIDDEN_LOGINS: &[&str] = &[
    "admin", "about", "access", "account", "accounts", "ad", "address", "adm",
    "administration", "administrator", "adult", "advertising", "affiliate", "affiliates", "ajax",
    "analytics", "android", "anon", "anonymous", "api", "app", "apps", "archive", "atom", "auth",
    "authentication", "avatar", "backup", "banner", "banners", "bin", "billing", "blog", "blogs",
    "board", "bot", "bots", "business", "chat", "cache", "cadastro", "calendar", "campaign",
    "careers", "cgi", "client", "cliente", "code", "comercial", "compare", "config",
    "connect", "contact", "contest", "create", "compras", "css", "dashboard", "data",
    "db", "delete", "demo", "design", "designer", "dev", "devel", "dir",
    "directory", "doc", "docs", "domain", "download", "downloads", "edit", "editor", "email",
    "ecommerce", "forum", "forums", "faq", "favorite", "feed", "feedback", "flog", "follow",
    "file", "files", "free", "ftp", "gadget", "gadgets", "games", "guest", "group", "groups",
    "help", "home", "homepage", "host", "hosting", "hostname", "html", "http", "httpd", "https",
    "hpg", "info", "information", "image", "img", "images", "imap", "index", "invite", "intranet",
    "indice", "ipad", "iphone", "irc", "java", "javascript", "job", "jobs", "js", "knowledgebase",
    "log", "login", "logs", "logout", "list", "lists", "mail", "mail1", "mail2", "mail3", "mail4",
    "mail5", "mailer", "mailing", "mx", "manager", "marketing", "master", "me", "media",
    "message", "microblog", "microblogs", "mine", "mp3", "msg", "msn", "mysql", "messenger",
    "mob", "mobile", "movie", "movies", "music", "musicas", "my", "name", "named", "net",
    "network", "new", "news", "newsletter", "nick", "nickname", "notes", "noticias", "ns", "ns1",
    "ns2", "ns3", "ns4", "old", "online", "operator", "order", "orders", "page", "pager",
    "pages", "panel", "password", "perl", "pic", "pics", "photo", "photos", "photoalbum",
    "php", "plugin", "plugins", "pop", "pop3", "post", "postmaster", "postfix", "posts",
    "profile", "project", "projects", "promo", "pub", "public", "python", "random", "register",
    "registration", "root", "ruby", "rss", "sale", "sales", "sample", "samples", "script",
    "scripts", "secure", "send", "service", "shop", "sql", "signup", "signin", "search",
    "security", "settings", "setting", "setup", "site", "sites", "sitemap", "smtp", "soporte",
    "ssh", "stage", "staging", "start", "subscribe", "subdomain", "suporte", "support", "stat",
    "static", "stats", "status", "store", "stores", "system", "tablet", "tablets", "tech",
    "telnet", "test", "test1", "test2", "test3", "teste", "tests", "theme", "themes", "tmp",
    "todo", "task", "tasks", "tools", "tv", "talk", "update", "upload", "url", "user",
    "username", "usuario", "usage", "vendas", "video", "videos", "visitor", "win", "ww", "www",
    "www1", "www2", "www3", "www4", "www5", "www6", "www7", "wwww", "wws", "wwws", "web",
    "webmail", "website", "websites", "webmaster", "workshop", "xxx", "xpg", "you", "yourname",
    "yourusername", "yoursite", "yourdomain",
];

const MESSAGES: &[(u16, &str)] = &[
    (0, "All the user logins are allowed."),
    (1, "All the forbidden logins have been renamed."),
    (100, "Unable to read the user list: %s."),
    (101, "Some forbidden logins are still in use: %s."),
    (102, "%1$s was not renamed: %2$s."),
    (200, "These user logins are forbidden: %s."),
    (201, "Unable to rename %s."),
    (202, "Choose a new login for %s."),
];

/// Characters a login may contain besides ASCII letters and digits
const LOGIN_EXTRA_CHARS: &str = " _.@-";

fn is_allowed_login_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || LOGIN_EXTRA_CHARS.contains(c)
}

pub struct BadUsernamesCheck {
    metadata: CheckMetadata,
    catalogue: MessageCatalogue,
}

impl BadUsernamesCheck {
    pub fn new() -> Self {
        Self {
            metadata: CheckMetadata::new(NAME, "Users & Login", Priority::Low)
                .with_title("Check if your users use forbidden logins.")
                .with_description(
                    "Logins like admin or webmaster are the first ones attackers try; \
                     a user holding one of them is half-way to being guessed.",
                )
                .with_fix_description("This will ask you to choose a new login for each offender.")
                .fixable(Fixable::Yes)
                .delayed_fix(),
            catalogue: MessageCatalogue::new(MESSAGES),
        }
    }
}

impl Default for BadUsernamesCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased forbidden logins for a context
fn forbidden_set(ctx: &CheckContext) -> HashSet<String> {
    match &ctx.forbidden_logins {
        Some(list) => list.iter().map(|l| l.trim().to_lowercase()).collect(),
        None => DEFAULT_FORBIDDEN_LOGINS
            .iter()
            .map(|l| l.to_string())
            .collect(),
    }
}

/// Logins in use that are forbidden, in user order
fn offenders(ctx: &CheckContext) -> siteguard_core::Result<Vec<String>> {
    let forbidden = forbidden_set(ctx);
    Ok(ctx
        .site
        .user_logins()?
        .into_iter()
        .filter(|login| forbidden.contains(&login.to_lowercase()))
        .collect())
}

/// Reason a submitted login is refused, if any
fn validate_login(
    candidate: &str,
    forbidden: &HashSet<String>,
    taken: &HashSet<String>,
) -> Option<&'static str> {
    if candidate.is_empty() {
        return Some("the new login is empty");
    }
    if !candidate.chars().all(is_allowed_login_char) {
        return Some("the new login contains forbidden characters");
    }
    if forbidden.contains(&candidate.to_lowercase()) {
        return Some("the new login is forbidden too");
    }
    if taken.contains(&candidate.to_lowercase()) {
        return Some("the new login is already used");
    }
    None
}

impl Check for BadUsernamesCheck {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn catalogue(&self) -> &MessageCatalogue {
        &self.catalogue
    }

    fn scan(&self, ctx: &CheckContext) -> ScanResult {
        let mut result = ScanResult::new();

        match offenders(ctx) {
            Ok(bad) if !bad.is_empty() => result.add_message(200, vec![bad.into()]),
            Ok(_) => {}
            Err(e) => result.add_message(100, vec![e.to_string().into()]),
        }

        result.maybe_set_status(0);
        result
    }

    fn fix(&self, ctx: &CheckContext) -> FixResult {
        let mut result = FixResult::new();

        let bad = match offenders(ctx) {
            Ok(bad) => bad,
            Err(e) => {
                result.add_message(100, vec![e.to_string().into()]);
                return result;
            }
        };

        if bad.is_empty() {
            result.add_message(0, vec![]);
            return result;
        }

        let fields = bad
            .iter()
            .map(|login| {
                FormField::new(format!("{}{}", FIELD_PREFIX, login), login.clone(), FieldKind::Text)
            })
            .collect();
        result.add_message(202, vec![bad.into()]);
        result.require_action(FixActionRequest::new(fields));
        result
    }

    fn manual_fix(
        &self,
        ctx: &CheckContext,
        action: &FixAction,
        submitted: &HashMap<String, String>,
    ) -> FixResult {
        let mut result = FixResult::new();
        let forbidden = forbidden_set(ctx);

        let mut taken: HashSet<String> = match ctx.site.user_logins() {
            Ok(logins) => logins.iter().map(|l| l.to_lowercase()).collect(),
            Err(e) => {
                result.add_message(100, vec![e.to_string().into()]);
                return result;
            }
        };

        let values = action.accepted_values(submitted);
        let mut refused = Vec::new();
        let mut renamed = 0usize;

        for field in &action.request.fields {
            let Some(old_login) = field.name.strip_prefix(FIELD_PREFIX) else {
                continue;
            };
            let candidate = values.get(field.name.as_str()).map_or("", |v| v.trim());

            if let Some(reason) = validate_login(candidate, &forbidden, &taken) {
                refused.push((old_login.to_string(), reason));
                continue;
            }

            match ctx.site.rename_user(old_login, candidate) {
                Ok(()) => {
                    info!("Renamed forbidden login {} to {}", old_login, candidate);
                    taken.remove(&old_login.to_lowercase());
                    taken.insert(candidate.to_lowercase());
                    renamed += 1;
                }
                Err(e) => {
                    warn!("Failed to rename {}: {}", old_login, e);
                    refused.push((old_login.to_string(), "the user could not be renamed"));
                }
            }
        }

        let remaining = match offenders(ctx) {
            Ok(remaining) => remaining,
            Err(e) => {
                result.add_message(100, vec![e.to_string().into()]);
                return result;
            }
        };

        if remaining.is_empty() {
            result.add_message(1, vec![]);
            return result;
        }

        if renamed == 0 {
            result.add_message(201, vec![remaining.into()]);
        } else {
            result.add_message(101, vec![remaining.into()]);
        }
        for (login, reason) in refused {
            result.add_message(102, vec![login.into(), reason.into()]);
        }
        result
    }
}
