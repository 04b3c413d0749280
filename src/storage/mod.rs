//! Snapshot persistence for almanack.
//!
//! This module provides durable storage for the practice snapshot,
//! supporting file-based and in-memory backends plus the asynchronous
//! writer that decouples mutations from disk latency.

pub mod file;
pub mod memory;
pub mod traits;
pub mod writer;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use traits::StateStore;
pub use writer::SnapshotWriter;
