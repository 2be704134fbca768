//! Long URL request check

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use siteguard_core::{
    Check, CheckContext, CheckMetadata, Error, FixResult, MessageCatalogue, Priority, Result,
    ScanResult,
};
use tracing::{debug, warn};

pub const NAME: &str = "long_url";

/// Length of the random query value
const PAYLOAD_LEN: usize = 255;

const MESSAGES: &[(u16, &str)] = &[
    (0, "You are currently blocking too long string requests."),
    (100, "Unable to determine status of your homepage."),
    (200, "Your website should block too long string requests."),
    (300, "I can not fix this, you have to do it yourself."),
];

pub struct LongUrlCheck {
    metadata: CheckMetadata,
    catalogue: MessageCatalogue,
}

impl LongUrlCheck {
    pub fn new() -> Self {
        Self {
            metadata: CheckMetadata::new(NAME, "WordPress", Priority::Medium)
                .with_title("Check if long URL can reach your website (more than 255 chars).")
                .with_description(
                    "Requests carrying very long query strings are a common vector for \
                     buffer overflows and injection attempts.",
                ),
            catalogue: MessageCatalogue::new(MESSAGES),
        }
    }
}

impl Default for LongUrlCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Home URL with a timestamp key and a random alphanumeric value
fn probe_url(home_url: &str) -> String {
    let payload: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PAYLOAD_LEN)
        .map(char::from)
        .collect();
    format!(
        "{}/?{}={}",
        home_url.trim_end_matches('/'),
        chrono::Utc::now().timestamp(),
        payload
    )
}

fn probe(ctx: &CheckContext) -> Result<StatusCode> {
    let client = Client::builder()
        .timeout(ctx.timeout)
        .redirect(Policy::none())
        .build()
        .map_err(|e| Error::Http(e.to_string()))?;

    let url = probe_url(ctx.site.home_url());
    debug!("Probing {} bytes URL", url.len());

    let response = client
        .get(&url)
        .send()
        .map_err(|e| Error::Http(e.to_string()))?;
    Ok(response.status())
}

impl Check for LongUrlCheck {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    fn catalogue(&self) -> &MessageCatalogue {
        &self.catalogue
    }

    fn scan(&self, ctx: &CheckContext) -> ScanResult {
        let mut result = ScanResult::new();

        match probe(ctx) {
            Ok(StatusCode::OK) => result.add_message(200, vec![]),
            Ok(status) => debug!("Long URL answered with {}", status),
            Err(e) => {
                warn!("Long URL probe failed: {}", e);
                result.add_message(100, vec![]);
            }
        }

        result.maybe_set_status(0);
        result
    }

    fn fix(&self, _ctx: &CheckContext) -> FixResult {
        let mut result = FixResult::cantfix();
        result.add_message(300, vec![]);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteguard_core::{FixStatus, MemorySite, ScanStatus};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Serve one request with the given status line, returning the base URL
    fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            )
            .unwrap();
        });
        format!("http://{}", addr)
    }

    fn ctx_for(url: &str) -> CheckContext {
        CheckContext::new(Arc::new(MemorySite::new("/srv/www", url)))
            .with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn test_probe_url_shape() {
        let url = probe_url("https://example.com/");
        let (base, query) = url.split_once("/?").unwrap();
        assert_eq!(base, "https://example.com");
        let (_, value) = query.split_once('=').unwrap();
        assert_eq!(value.len(), PAYLOAD_LEN);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_ok_response_is_bad() {
        let url = serve_once("200 OK");
        let result = LongUrlCheck::new().scan(&ctx_for(&url));
        assert_eq!(result.status, ScanStatus::Bad);
    }

    #[test]
    fn test_rejected_request_is_good() {
        let url = serve_once("414 URI Too Long");
        let result = LongUrlCheck::new().scan(&ctx_for(&url));
        assert_eq!(result.status, ScanStatus::Good);
    }

    #[test]
    fn test_unreachable_is_warning() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let result = LongUrlCheck::new().scan(&ctx_for(&url));
        assert_eq!(result.status, ScanStatus::Warning);
    }

    #[test]
    fn test_fix_is_cantfix() {
        let check = LongUrlCheck::new();
        let fix = check.fix(&ctx_for("http://localhost"));
        assert_eq!(fix.status, FixStatus::CantFix);
        assert_eq!(fix.messages[0].id, 300);
    }
}
