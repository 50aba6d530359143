pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::storage::StorageClient;
pub use domain::escrow::EscrowContract;
pub use domain::keys::{Authorization, KeyPair, PrivateKey, PublicKey};
pub use domain::manifest::{Address, JobMode, Manifest, RequestType};
pub use domain::money::{Cents, to_cents};
pub use domain::ports::{ContentReference, LedgerClient, LedgerClientBox, StorageBackend, StorageBackendBox};
pub use error::{EscrowError, Result};
