//! Orchestration over the domain ports.

pub mod storage;
