//! Adapters implementing the domain ports.

pub mod clock;
pub mod in_memory;
pub mod payee;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
