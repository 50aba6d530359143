use super::keys::{Authorization, KeyPair};
use super::manifest::{Address, Manifest};
use super::money::{Cents, to_cents};
use super::ports::{ContentReference, LedgerClientBox};
use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
enum LifecycleStage {
    #[default]
    Unbound,
    Deployed,
    Funded,
}

/// Escrow lifecycle for one task batch, bound to one ledger asset.
///
/// Stages move strictly forward: `Unbound → Deployed → Funded`, after which
/// the contract accepts payouts until the escrowed amount or the payout slot
/// quota is exhausted. The ledger address, total amount, and oracle stake are
/// written once at deploy and never change.
///
/// Mutating methods take `&mut self`, so a single instance is serialized by
/// construction; independent contracts share no state and may run in
/// parallel. No ledger call is ever retried internally: a payout that fails
/// in transport may still have landed, and reconciliation belongs to the
/// caller.
pub struct EscrowContract {
    manifest: Manifest,
    ledger: LedgerClientBox,
    stage: LifecycleStage,
    ledger_address: Option<Address>,
    amount: Cents,
    oracle_stake: Cents,
    number_of_answers: u64,
    payouts_issued: u64,
    cumulative_paid: Cents,
}

impl EscrowContract {
    /// Binds a manifest to a ledger transport. The manifest is consumed
    /// read-only; nothing touches the ledger until `deploy`.
    pub fn new(manifest: Manifest, ledger: LedgerClientBox) -> Self {
        Self {
            manifest,
            ledger,
            stage: LifecycleStage::Unbound,
            ledger_address: None,
            amount: Cents::ZERO,
            oracle_stake: Cents::ZERO,
            number_of_answers: 0,
            payouts_issued: 0,
            cumulative_paid: Cents::ZERO,
        }
    }

    /// Initializes the ledger asset exactly once.
    ///
    /// Converts the manifest's money fields to fixed-point units, calls
    /// `initialize` on the ledger, and binds the returned address. The
    /// manifest is re-validated here so a caller that skipped validation
    /// cannot reach the ledger with a malformed batch.
    pub async fn deploy(&mut self, keypair: &KeyPair) -> Result<()> {
        if self.stage != LifecycleStage::Unbound {
            return Err(EscrowError::AlreadyDeployed);
        }
        self.manifest.validate()?;

        let per_task = to_cents(self.manifest.task_bid_price)?;
        let amount = per_task
            .checked_mul(self.manifest.job_total_tasks)
            .ok_or(EscrowError::Overflow(self.manifest.task_bid_price))?;
        let oracle_stake = to_cents(self.manifest.oracle_stake)?;

        let address = self
            .ledger
            .initialize(
                &self.manifest.recording_oracle_addr,
                amount,
                oracle_stake,
                self.manifest.job_total_tasks,
                keypair,
            )
            .await?;

        self.ledger_address = Some(address);
        self.amount = amount;
        self.oracle_stake = oracle_stake;
        self.number_of_answers = self.manifest.job_total_tasks;
        self.stage = LifecycleStage::Deployed;
        Ok(())
    }

    /// Moves the full escrowed amount to the bound ledger address.
    ///
    /// Deliberately not idempotent: a repeated call would double-fund, so it
    /// fails with `AlreadyFunded` instead.
    pub async fn fund(&mut self) -> Result<()> {
        match self.stage {
            LifecycleStage::Unbound => return Err(EscrowError::NotDeployed),
            LifecycleStage::Funded => return Err(EscrowError::AlreadyFunded),
            LifecycleStage::Deployed => {}
        }
        let address = self.bound_address()?.clone();
        self.ledger.transfer(&address, self.amount).await?;
        self.stage = LifecycleStage::Funded;
        Ok(())
    }

    /// Releases one task's payment to a recipient.
    pub async fn payout(
        &mut self,
        per_task_amount: Decimal,
        recipient: &Address,
        results: &ContentReference,
        keypair: &KeyPair,
    ) -> Result<()> {
        self.require_funded()?;
        self.reserve_slots(1)?;
        let amount = to_cents(per_task_amount)?;
        let paid = self.charge(amount)?;

        let address = self.bound_address()?.clone();
        let auth = Authorization::derive(keypair);
        self.ledger
            .partial_payout(&address, amount, recipient, results, &auth)
            .await?;

        // Accounting is committed only after the ledger call returns.
        self.cumulative_paid = paid;
        self.payouts_issued += 1;
        Ok(())
    }

    /// Releases a batch of payments in a single ledger call.
    ///
    /// Each recipient consumes one payout slot; the overdraft check runs
    /// against the batch sum before anything is sent.
    pub async fn bulk_payout(
        &mut self,
        recipients: &[Address],
        amounts: &[Decimal],
        results: &ContentReference,
        keypair: &KeyPair,
    ) -> Result<()> {
        self.require_funded()?;
        if recipients.len() != amounts.len() {
            return Err(EscrowError::MalformedBatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        self.reserve_slots(recipients.len() as u64)?;

        let mut converted = Vec::with_capacity(amounts.len());
        let mut batch_total = Cents::ZERO;
        for amount in amounts {
            let cents = to_cents(*amount)?;
            batch_total = batch_total
                .checked_add(cents)
                .ok_or(EscrowError::Overflow(*amount))?;
            converted.push(cents);
        }
        let paid = self.charge(batch_total)?;

        let address = self.bound_address()?.clone();
        let auth = Authorization::derive(keypair);
        self.ledger
            .bulk_payout(&address, recipients, &converted, results, &auth)
            .await?;

        self.cumulative_paid = paid;
        self.payouts_issued += recipients.len() as u64;
        Ok(())
    }

    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn oracle_stake(&self) -> Cents {
        self.oracle_stake
    }

    pub fn number_of_answers(&self) -> u64 {
        self.number_of_answers
    }

    pub fn cumulative_paid(&self) -> Cents {
        self.cumulative_paid
    }

    pub fn ledger_address(&self) -> Option<&Address> {
        self.ledger_address.as_ref()
    }

    pub fn is_funded(&self) -> bool {
        self.stage == LifecycleStage::Funded
    }

    fn require_funded(&self) -> Result<()> {
        match self.stage {
            LifecycleStage::Unbound => Err(EscrowError::NotDeployed),
            LifecycleStage::Deployed => Err(EscrowError::NotFunded),
            LifecycleStage::Funded => Ok(()),
        }
    }

    fn bound_address(&self) -> Result<&Address> {
        self.ledger_address.as_ref().ok_or(EscrowError::NotDeployed)
    }

    fn reserve_slots(&self, requested: u64) -> Result<()> {
        let remaining = self.number_of_answers - self.payouts_issued;
        if requested > remaining {
            return Err(EscrowError::QuotaExceeded(self.number_of_answers));
        }
        Ok(())
    }

    /// Returns the new cumulative total without committing it.
    fn charge(&self, amount: Cents) -> Result<Cents> {
        let paid = self
            .cumulative_paid
            .checked_add(amount)
            .filter(|paid| *paid <= self.amount)
            .ok_or(EscrowError::Overdraft {
                requested: amount.value(),
                remaining: self.amount.value() - self.cumulative_paid.value(),
            })?;
        Ok(paid)
    }
}
