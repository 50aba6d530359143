//! Pure types and the escrow state machine. Nothing in this layer performs
//! I/O; ledger and storage access go through the traits in [`ports`].

pub mod escrow;
pub mod keys;
pub mod manifest;
pub mod money;
pub mod ports;
