//! # Request ID Tracking
//!
//! Request identifiers using CUID2 for collision-resistant, URL-safe ids.

use std::{fmt, str::FromStr};

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Accept a client supplied id when it looks like one we would generate,
    /// otherwise mint a fresh one.
    pub fn from_header_or_new(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl FromStr for RequestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if (16 ..= 64).contains(&s.len()) && valid_chars {
            Ok(Self(s.to_string()))
        }
        else {
            Err("Invalid request ID format".to_string())
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_parse() {
        let cuid = "k192v2g4w3zq8h6j5k1abc";
        let id: RequestId = cuid.parse().unwrap();
        assert_eq!(id.as_str(), cuid);
    }

    #[test]
    fn test_request_id_parse_invalid() {
        assert!("short".parse::<RequestId>().is_err());
        assert!("invalid!@#invalid!@#invalid".parse::<RequestId>().is_err());
    }

    #[test]
    fn test_header_fallback_generates_new_id() {
        let id = RequestId::from_header_or_new(Some("bad"));
        assert_ne!(id.as_str(), "bad");
        assert!(!id.as_str().is_empty());

        let kept = RequestId::from_header_or_new(Some("abcdefghijklmnopqrst"));
        assert_eq!(kept.as_str(), "abcdefghijklmnopqrst");
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(id.to_string(), id.as_str());
    }
}
