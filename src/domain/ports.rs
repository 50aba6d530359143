use super::keys::{Authorization, KeyPair};
use super::manifest::Address;
use super::money::Cents;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque handle to a ciphertext held by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentReference(String);

impl ContentReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transport to an already-deployed ledger escrow primitive.
///
/// Every amount is already converted to fixed-point units; implementations
/// must not perform their own retries of payout calls.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Binds a new escrow asset and returns its ledger address. The signer
    /// keypair authorizes the deployment transaction.
    async fn initialize(
        &self,
        oracle: &Address,
        amount: Cents,
        oracle_stake: Cents,
        num_answers: u64,
        signer: &KeyPair,
    ) -> Result<Address>;

    async fn transfer(&self, to: &Address, amount: Cents) -> Result<()>;

    async fn partial_payout(
        &self,
        contract: &Address,
        amount: Cents,
        recipient: &Address,
        results: &ContentReference,
        auth: &Authorization,
    ) -> Result<()>;

    async fn bulk_payout(
        &self,
        contract: &Address,
        recipients: &[Address],
        amounts: &[Cents],
        results: &ContentReference,
        auth: &Authorization,
    ) -> Result<()>;
}

/// Byte store addressed by opaque references.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn put(&self, data: Vec<u8>) -> Result<ContentReference>;
    async fn get(&self, reference: &ContentReference) -> Result<Vec<u8>>;
}

pub type LedgerClientBox = Box<dyn LedgerClient>;
pub type StorageBackendBox = Box<dyn StorageBackend>;
