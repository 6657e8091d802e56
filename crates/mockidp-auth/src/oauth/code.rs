//! Authorization code grants.
//!
//! A grant binds one opaque authorization code to the identity and nonce
//! that produced it. Grants are created at login, read exactly once at token
//! exchange (unless single-use enforcement is disabled), and never mutated.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// An issued authorization code and the identity it was bound to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGrant {
    /// Authorization code (one-time use).
    /// 256-bit random value, base64url-encoded.
    pub code: String,

    /// The claimed username this code was issued for.
    pub subject: String,

    /// OpenID Connect nonce carried from the authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Timestamp when the grant was created. Stored so a persistent backend
    /// can expire stale codes; the in-memory store does not.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl CodeGrant {
    /// Creates a grant with a freshly generated code.
    #[must_use]
    pub fn new(subject: impl Into<String>, nonce: Option<String>) -> Self {
        Self {
            code: Self::generate_code(),
            subject: subject.into(),
            nonce,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Generates a new cryptographically secure authorization code.
    ///
    /// 32 random bytes encoded as base64url without padding (43 characters).
    ///
    /// # Security
    ///
    /// Uses the system's cryptographically secure random number generator.
    /// The resulting code has 256 bits of entropy, exceeding the OAuth 2.0
    /// recommendation of at least 128 bits. Codes carry no information about
    /// the identity they are bound to.
    #[must_use]
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_length_and_alphabet() {
        let code = CodeGrant::generate_code();
        assert_eq!(code.len(), 43);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let a = CodeGrant::new("alice", None);
        let b = CodeGrant::new("alice", None);
        assert_ne!(a.code, b.code);
    }

    #[test]
    fn test_grant_binds_subject_and_nonce() {
        let grant = CodeGrant::new("alice", Some("n1".to_string()));
        assert_eq!(grant.subject, "alice");
        assert_eq!(grant.nonce.as_deref(), Some("n1"));
    }

    #[test]
    fn test_grant_serialization_skips_absent_nonce() {
        let grant = CodeGrant::new("bob", None);
        let json = serde_json::to_string(&grant).unwrap();
        assert!(!json.contains("nonce"));
        assert!(json.contains("\"subject\":\"bob\""));
    }
}
