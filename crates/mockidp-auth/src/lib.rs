//! # mockidp-auth
//!
//! Protocol core of mockidp, a minimal OpenID Connect identity provider for
//! exercising a Relying Party's authorization-code flow without a real
//! identity backend.
//!
//! This crate provides:
//! - ES256 signing key lifecycle and JWKS publication
//! - Authorization code issuance and single-use redemption
//! - ID token construction and signing
//! - Axum handlers for the five provider endpoints
//!
//! ## Overview
//!
//! There is no user directory and no credential verification: whatever
//! username the login form claims becomes the token subject. Everything
//! else - random single-use codes, real ES256 signatures, escaped output,
//! a pluggable code store - behaves the way a Relying Party under test
//! should expect from a production provider.
//!
//! ## Modules
//!
//! - [`config`] - Provider configuration
//! - [`keys`] - Signing key pair and JWKS types
//! - [`oauth`] - Authorization code flow orchestration
//! - [`storage`] - Storage trait for issued codes
//! - [`token`] - ID token claims and signing
//! - [`http`] - Axum HTTP handlers for the provider endpoints

pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod oauth;
pub mod storage;
pub mod token;

pub use config::IdpConfig;
pub use error::IdpError;
pub use http::{IdpState, ProviderMetadata, router};
pub use keys::{Jwk, Jwks, SIGNING_ALG, SigningKeyPair};
pub use oauth::{AuthorizationService, CodeGrant};
pub use storage::{CodeStorage, InMemoryCodeStorage};
pub use token::{IdTokenClaims, TokenIssuer, TokenResponse};

/// Type alias for provider results.
pub type IdpResult<T> = Result<T, IdpError>;
