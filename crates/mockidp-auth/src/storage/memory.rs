//! In-memory authorization code storage.

use dashmap::DashMap;

use crate::IdpResult;
use crate::error::IdpError;
use crate::oauth::code::CodeGrant;
use crate::storage::code::CodeStorage;

/// Concurrency-safe in-memory code store.
///
/// Backs the provider in its default single-process deployment. Entries are
/// removed when consumed; grants that are never redeemed stay resident for
/// the process lifetime, which is fine for a test fixture but is why the
/// storage trait exists for anything longer-lived.
#[derive(Debug, Default)]
pub struct InMemoryCodeStorage {
    grants: DashMap<String, CodeGrant>,
}

impl InMemoryCodeStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of grants currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns `true` if no grants are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[async_trait::async_trait]
impl CodeStorage for InMemoryCodeStorage {
    async fn create(&self, grant: &CodeGrant) -> IdpResult<()> {
        if self
            .grants
            .insert(grant.code.clone(), grant.clone())
            .is_some()
        {
            // 256-bit random codes do not collide in practice; a duplicate
            // means the caller reused a code value.
            return Err(IdpError::storage("duplicate authorization code"));
        }
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> IdpResult<Option<CodeGrant>> {
        Ok(self.grants.get(code).map(|entry| entry.value().clone()))
    }

    async fn consume(&self, code: &str) -> IdpResult<Option<CodeGrant>> {
        Ok(self.grants.remove(code).map(|(_, grant)| grant))
    }
}
