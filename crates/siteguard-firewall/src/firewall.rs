//! Request evaluation against the deny lists

use crate::lists::{DenyCategory, DenyLists};
use crate::matcher::DenyPattern;
use crate::request::{BlockId, Decision, Request};
use crate::Result;
use regex::Regex;
use tracing::{debug, warn};

/// Methods accepted when the request method rule is on
pub const DEFAULT_ALLOWED_METHODS: &[&str] =
    &["GET", "POST", "HEAD", "PUT", "DELETE", "OPTIONS", "PATCH"];

/// Status for a disallowed method
const METHOD_STATUS: u16 = 405;
/// Status for a rejected user agent
const USER_AGENT_STATUS: u16 = 403;
/// Status for bad URL, host or referer contents
const CONTENT_STATUS: u16 = 503;

/// Compiled deny lists evaluated in a fixed order; the first match blocks
#[derive(Debug, Clone)]
pub struct Firewall {
    allowed_methods: Vec<String>,
    check_methods: bool,
    check_html_agents: bool,
    html_tag: Regex,
    user_agents: DenyPattern,
    url_contents: DenyPattern,
    host_contents: DenyPattern,
    referer_contents: DenyPattern,
}

impl Firewall {
    /// Compile every list once; evaluation does no further allocation of patterns
    pub fn new(lists: &DenyLists) -> Result<Self> {
        Ok(Self {
            allowed_methods: DEFAULT_ALLOWED_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            check_methods: true,
            check_html_agents: true,
            html_tag: Regex::new(r"<[^>]*>")?,
            user_agents: DenyPattern::compile(lists.get(DenyCategory::UserAgents))?,
            url_contents: DenyPattern::compile(lists.get(DenyCategory::UrlContents))?,
            host_contents: DenyPattern::compile(lists.get(DenyCategory::HostContents))?,
            referer_contents: DenyPattern::compile(lists.get(DenyCategory::RefererContents))?,
        })
    }

    /// Firewall with the curated default lists
    pub fn with_defaults() -> Result<Self> {
        Self::new(&DenyLists::default())
    }

    pub fn with_allowed_methods<S: AsRef<str>>(mut self, methods: &[S]) -> Self {
        self.allowed_methods = methods.iter().map(|m| m.as_ref().to_string()).collect();
        self
    }

    pub fn with_method_check(mut self, enabled: bool) -> Self {
        self.check_methods = enabled;
        self
    }

    pub fn with_html_agent_check(mut self, enabled: bool) -> Self {
        self.check_html_agents = enabled;
        self
    }

    /// Evaluate a request: method, HTML in user agent, user agent list, URL,
    /// host, referer. Later rules are skipped once one blocks.
    pub fn evaluate(&self, request: &Request) -> Decision {
        let decision = self.first_block(request);
        match decision {
            Decision::Blocked { block_id, status } => {
                warn!(
                    block_id = block_id.as_str(),
                    status,
                    uri = %request.uri,
                    "Blocked request: {}",
                    block_id.description()
                );
            }
            Decision::Pass => debug!(uri = %request.uri, "Request passed"),
        }
        decision
    }

    fn first_block(&self, request: &Request) -> Decision {
        if self.check_methods
            && !request.method.is_empty()
            && !self.allowed_methods.iter().any(|m| *m == request.method)
        {
            return Decision::blocked(BlockId::Rmhm, METHOD_STATUS);
        }

        if self.check_html_agents && self.html_tag.is_match(&request.user_agent) {
            return Decision::blocked(BlockId::Uaht, USER_AGENT_STATUS);
        }

        let rules = [
            (&self.user_agents, &request.user_agent, BlockId::Uahb, USER_AGENT_STATUS),
            (&self.url_contents, &request.uri, BlockId::Buc, CONTENT_STATUS),
            (&self.host_contents, &request.host, BlockId::Bhc, CONTENT_STATUS),
            (&self.referer_contents, &request.referer, BlockId::Brc, CONTENT_STATUS),
        ];

        rules
            .into_iter()
            .find(|(pattern, value, _, _)| pattern.is_match(value))
            .map_or(Decision::Pass, |(_, _, id, status)| Decision::blocked(id, status))
    }
}
