use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EscrowError>;

#[derive(Error, Debug)]
pub enum EscrowError {
    #[error("manifest validation failed: {0}")]
    InvalidManifest(String),
    #[error("amount {0} cannot be scaled to fixed-point units")]
    Precision(Decimal),
    #[error("amount {0} is outside the representable on-chain range")]
    Overflow(Decimal),
    #[error("escrow has already been deployed")]
    AlreadyDeployed,
    #[error("escrow has not been deployed")]
    NotDeployed,
    #[error("escrow has already been funded")]
    AlreadyFunded,
    #[error("escrow has not been funded")]
    NotFunded,
    #[error("payout of {requested} units exceeds the {remaining} units left in escrow")]
    Overdraft { requested: u64, remaining: u64 },
    #[error("all {0} authorized payout slots have been used")]
    QuotaExceeded(u64),
    #[error("batch has {recipients} recipients but {amounts} amounts")]
    MalformedBatch { recipients: usize, amounts: usize },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("crypto failure: {0}")]
    Crypto(String),
}
