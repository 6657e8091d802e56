//! ES256 signing key management.
//!
//! The provider holds exactly one P-256 key pair for its entire lifetime:
//! generated at startup (or loaded from PEM for deterministic tests), never
//! rotated, never revoked. The public half is published as a JWK so Relying
//! Parties can verify issued tokens.
//!
//! There is no key rotation story here. That is acceptable for a test
//! identity provider and would be the first thing to fix in a production one.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use p256::SecretKey as EcSecretKey;
use p256::ecdsa::SigningKey as EcSigningKey;
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::IdpError;

/// The JWS algorithm name this provider signs with.
pub const SIGNING_ALG: &str = "ES256";

/// An ES256 (P-256) signing key pair.
///
/// Exclusively owned by the provider and immutable after creation. Thread
/// safe; share it via `Arc`.
pub struct SigningKeyPair {
    /// Key ID, fixed at creation and echoed in token headers and the JWK.
    pub kid: String,

    /// Encoding key (private key) for signing.
    encoding_key: EncodingKey,

    /// Decoding key (public key) for verification.
    decoding_key: DecodingKey,

    /// Uncompressed public point coordinates for JWK export.
    x: Vec<u8>,
    y: Vec<u8>,

    /// When the key was created.
    pub created_at: OffsetDateTime,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("kid", &self.kid)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl SigningKeyPair {
    /// Generates a new random P-256 key pair.
    ///
    /// The process cannot serve without a signing key, so callers should
    /// treat a failure here as fatal at startup.
    ///
    /// # Errors
    /// Returns an error if key generation or PEM export fails.
    pub fn generate() -> Result<Self, IdpError> {
        let secret_key = EcSecretKey::random(&mut OsRng);
        Self::from_secret_key(uuid::Uuid::new_v4().to_string(), &secret_key)
    }

    /// Loads a key pair from a PKCS#8 PEM private key.
    ///
    /// Intended for tests that need a deterministic key.
    ///
    /// # Errors
    /// Returns an error if the PEM data is not a valid P-256 private key.
    pub fn from_pkcs8_pem(kid: impl Into<String>, private_pem: &str) -> Result<Self, IdpError> {
        let secret_key = EcSecretKey::from_pkcs8_pem(private_pem)
            .map_err(|e| IdpError::key_generation(e.to_string()))?;
        Self::from_secret_key(kid.into(), &secret_key)
    }

    fn from_secret_key(kid: String, secret_key: &EcSecretKey) -> Result<Self, IdpError> {
        let signing_key = EcSigningKey::from(secret_key);
        let point = signing_key.verifying_key().to_encoded_point(false);
        let x = point
            .x()
            .ok_or_else(|| IdpError::key_generation("missing x coordinate"))?;
        let y = point
            .y()
            .ok_or_else(|| IdpError::key_generation("missing y coordinate"))?;

        // jsonwebtoken wants PKCS#8 PEM for the private half and base64url
        // coordinates for the public half.
        let private_pem = secret_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| IdpError::key_generation(e.to_string()))?;
        let encoding_key = EncodingKey::from_ec_pem(private_pem.as_bytes())
            .map_err(|e| IdpError::key_generation(e.to_string()))?;

        let x_b64 = URL_SAFE_NO_PAD.encode(x.as_slice());
        let y_b64 = URL_SAFE_NO_PAD.encode(y.as_slice());
        let decoding_key = DecodingKey::from_ec_components(&x_b64, &y_b64)
            .map_err(|e| IdpError::key_generation(e.to_string()))?;

        Ok(Self {
            kid,
            encoding_key,
            decoding_key,
            x: x.to_vec(),
            y: y.to_vec(),
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// The `jsonwebtoken` algorithm this pair signs with.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::ES256
    }

    /// The private key, for token encoding.
    #[must_use]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// The public key, for token verification.
    #[must_use]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Exports the public key as a JWK.
    #[must_use]
    pub fn to_jwk(&self) -> Jwk {
        Jwk {
            kty: "EC".to_string(),
            kid: self.kid.clone(),
            use_: "sig".to_string(),
            alg: SIGNING_ALG.to_string(),
            crv: "P-256".to_string(),
            x: URL_SAFE_NO_PAD.encode(&self.x),
            y: URL_SAFE_NO_PAD.encode(&self.y),
        }
    }

    /// Exports the public key wrapped in a one-key JWKS envelope.
    #[must_use]
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: vec![self.to_jwk()],
        }
    }
}

/// JSON Web Key Set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    /// The keys in this set.
    pub keys: Vec<Jwk>,
}

/// JSON Web Key (EC public key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type, always "EC".
    pub kty: String,

    /// Key ID.
    pub kid: String,

    /// Key use, always "sig".
    #[serde(rename = "use")]
    pub use_: String,

    /// Algorithm, always "ES256".
    pub alg: String,

    /// Curve name, always "P-256".
    pub crv: String,

    /// X coordinate (base64url encoded).
    pub x: String,

    /// Y coordinate (base64url encoded).
    pub y: String,
}
