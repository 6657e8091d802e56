//! Authorization code storage trait.
//!
//! This module defines the storage interface for issued authorization codes.
//! The protocol logic only ever talks to this trait, so a deployment can back
//! it with an in-memory map, a database, or a cache without the flow noticing.
//!
//! # Implementation Notes
//!
//! Implementations should:
//!
//! - Support efficient lookup by authorization code
//! - Make `consume` atomic (a code must be redeemable at most once under
//!   concurrent exchange attempts)
//!
//! # Security Considerations
//!
//! - Never log authorization codes
//! - Implement proper access controls on the storage backend

use async_trait::async_trait;

use crate::IdpResult;
use crate::oauth::code::CodeGrant;

/// Storage trait for authorization code grants.
///
/// # Implementations
///
/// An in-memory implementation is provided in [`super::memory`].
#[async_trait]
pub trait CodeStorage: Send + Sync {
    /// Persists a new grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant cannot be stored or its code collides
    /// with one already present.
    async fn create(&self, grant: &CodeGrant) -> IdpResult<()>;

    /// Finds a grant by authorization code without consuming it.
    ///
    /// Returns `None` if the code is unknown or already consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_code(&self, code: &str) -> IdpResult<Option<CodeGrant>>;

    /// Consumes an authorization code, removing it from the store.
    ///
    /// Returns the grant on the first call for a known code and `None` on
    /// every subsequent call.
    ///
    /// # Atomicity
    ///
    /// This operation must be atomic so two concurrent exchange attempts for
    /// the same code cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn consume(&self, code: &str) -> IdpResult<Option<CodeGrant>>;
}
