//! Concrete adapters: the integrated-encryption cipher and in-memory
//! implementations of the ledger and storage ports.

pub mod cipher;
pub mod in_memory;
