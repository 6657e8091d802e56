//! Token generation and validation.

pub mod claims;
pub mod issuer;

pub use claims::IdTokenClaims;
pub use issuer::{TokenIssuer, TokenResponse};
