use crate::domain::keys::{Authorization, KeyPair, PublicKey};
use crate::domain::manifest::Address;
use crate::domain::money::Cents;
use crate::domain::ports::{ContentReference, LedgerClient, StorageBackend};
use crate::error::{EscrowError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct InitializeCall {
    pub oracle: Address,
    pub amount: Cents,
    pub oracle_stake: Cents,
    pub num_answers: u64,
    pub signer: PublicKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferCall {
    pub to: Address,
    pub amount: Cents,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialPayoutCall {
    pub contract: Address,
    pub amount: Cents,
    pub recipient: Address,
    pub results: ContentReference,
    pub signer: PublicKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkPayoutCall {
    pub contract: Address,
    pub recipients: Vec<Address>,
    pub amounts: Vec<Cents>,
    pub results: ContentReference,
    pub signer: PublicKey,
}

#[derive(Default)]
struct LedgerLog {
    initializes: Vec<InitializeCall>,
    transfers: Vec<TransferCall>,
    partial_payouts: Vec<PartialPayoutCall>,
    bulk_payouts: Vec<BulkPayoutCall>,
}

/// Ledger transport that records every call instead of reaching a chain.
///
/// `Clone` shares the underlying log, so tests keep a handle while the
/// contract owns the boxed port, and assert call counts and arguments
/// afterwards. Addresses are minted deterministically per `initialize`.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    log: Arc<RwLock<LedgerLog>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn initialize_calls(&self) -> Vec<InitializeCall> {
        self.log.read().await.initializes.clone()
    }

    pub async fn transfers(&self) -> Vec<TransferCall> {
        self.log.read().await.transfers.clone()
    }

    pub async fn partial_payouts(&self) -> Vec<PartialPayoutCall> {
        self.log.read().await.partial_payouts.clone()
    }

    pub async fn bulk_payouts(&self) -> Vec<BulkPayoutCall> {
        self.log.read().await.bulk_payouts.clone()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn initialize(
        &self,
        oracle: &Address,
        amount: Cents,
        oracle_stake: Cents,
        num_answers: u64,
        signer: &KeyPair,
    ) -> Result<Address> {
        let mut log = self.log.write().await;
        log.initializes.push(InitializeCall {
            oracle: oracle.clone(),
            amount,
            oracle_stake,
            num_answers,
            signer: signer.public,
        });
        let address = Address::parse(&format!("0x{:040x}", log.initializes.len()))?;
        Ok(address)
    }

    async fn transfer(&self, to: &Address, amount: Cents) -> Result<()> {
        self.log.write().await.transfers.push(TransferCall {
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    async fn partial_payout(
        &self,
        contract: &Address,
        amount: Cents,
        recipient: &Address,
        results: &ContentReference,
        auth: &Authorization,
    ) -> Result<()> {
        self.log.write().await.partial_payouts.push(PartialPayoutCall {
            contract: contract.clone(),
            amount,
            recipient: recipient.clone(),
            results: results.clone(),
            signer: *auth.signer_public(),
        });
        Ok(())
    }

    async fn bulk_payout(
        &self,
        contract: &Address,
        recipients: &[Address],
        amounts: &[Cents],
        results: &ContentReference,
        auth: &Authorization,
    ) -> Result<()> {
        self.log.write().await.bulk_payouts.push(BulkPayoutCall {
            contract: contract.clone(),
            recipients: recipients.to_vec(),
            amounts: amounts.to_vec(),
            results: results.clone(),
            signer: *auth.signer_public(),
        });
        Ok(())
    }
}

/// Content-addressed in-memory byte store.
///
/// References are the hex-encoded SHA-256 of the stored bytes, so putting the
/// same ciphertext twice yields the same reference.
#[derive(Default, Clone)]
pub struct InMemoryStorage {
    blobs: Arc<RwLock<HashMap<ContentReference, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn put(&self, data: Vec<u8>) -> Result<ContentReference> {
        let reference = ContentReference::new(hex::encode(Sha256::digest(&data)));
        self.blobs.write().await.insert(reference.clone(), data);
        Ok(reference)
    }

    async fn get(&self, reference: &ContentReference) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(reference)
            .cloned()
            .ok_or_else(|| EscrowError::Transport(format!("no blob at reference {reference}")))
    }
}
