//! Inbound request fields and evaluation outcomes

use serde::{Deserialize, Serialize};

/// The request fields the firewall inspects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub method: String,
    pub user_agent: String,
    /// Request URI, path and query
    pub uri: String,
    /// Remote host name of the client
    pub host: String,
    pub referer: String,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }
}

/// Why a request was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockId {
    /// Antispam, anti-usurpation
    Aau,
    /// Bad URL contents
    Buc,
    /// Bad host contents
    Bhc,
    /// Bad referer contents
    Brc,
    /// Bad GeoIP
    Gip,
    /// Bad request method
    Rmhm,
    /// User agent with HTML tags
    Uaht,
    /// Blacklisted user agent
    Uahb,
}

impl BlockId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockId::Aau => "AAU",
            BlockId::Buc => "BUC",
            BlockId::Bhc => "BHC",
            BlockId::Brc => "BRC",
            BlockId::Gip => "GIP",
            BlockId::Rmhm => "RMHM",
            BlockId::Uaht => "UAHT",
            BlockId::Uahb => "UAHB",
        }
    }

    /// Human-readable reason
    pub fn description(&self) -> &'static str {
        match self {
            BlockId::Aau => "Antispam, Anti-Usurpation",
            BlockId::Buc => "Bad URL Contents",
            BlockId::Bhc => "Bad Host Contents",
            BlockId::Brc => "Bad Referer Contents",
            BlockId::Gip => "Bad GeoIP",
            BlockId::Rmhm => "Bad Request Method",
            BlockId::Uaht => "User-Agent With HTML Tags",
            BlockId::Uahb => "User-Agent Blacklisted",
        }
    }

    /// Look up a block id by its code, e.g. `UAHB`
    pub fn from_code(code: &str) -> Option<Self> {
        [
            BlockId::Aau,
            BlockId::Buc,
            BlockId::Bhc,
            BlockId::Brc,
            BlockId::Gip,
            BlockId::Rmhm,
            BlockId::Uaht,
            BlockId::Uahb,
        ]
        .into_iter()
        .find(|id| id.as_str().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of evaluating a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Pass,
    Blocked { block_id: BlockId, status: u16 },
}

impl Decision {
    pub fn blocked(block_id: BlockId, status: u16) -> Self {
        Decision::Blocked { block_id, status }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Blocked { .. })
    }

    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            Decision::Blocked { block_id, .. } => Some(*block_id),
            Decision::Pass => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_codes() {
        assert_eq!(BlockId::Uahb.as_str(), "UAHB");
        assert_eq!(BlockId::Bhc.description(), "Bad Host Contents");
        assert_eq!(BlockId::from_code("rmhm"), Some(BlockId::Rmhm));
        assert_eq!(BlockId::from_code("XYZ"), None);
        assert_eq!(serde_json::to_string(&BlockId::Buc).unwrap(), "\"BUC\"");
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_value(Decision::blocked(BlockId::Uahb, 403)).unwrap();
        assert_eq!(json["decision"], "blocked");
        assert_eq!(json["block_id"], "UAHB");
        assert_eq!(json["status"], 403);
        assert!(!Decision::Pass.is_blocked());
    }
}
