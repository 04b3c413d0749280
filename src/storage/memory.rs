//! In-memory snapshot storage for testing and embedding.

use std::sync::RwLock;

use crate::core::PracticeState;
use crate::error::Result;
use crate::storage::StateStore;

/// In-memory snapshot store.
///
/// Thread-safe single-slot store behind an `RwLock`. The snapshot is lost
/// when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: RwLock<Option<PracticeState>>,
}

impl MemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// Check if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.state.read().unwrap().is_none()
    }

    /// Drop any saved snapshot.
    pub fn clear(&self) {
        *self.state.write().unwrap() = None;
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PracticeState>> {
        Ok(self.state.read().unwrap().clone())
    }

    fn save(&self, state: &PracticeState) -> Result<()> {
        *self.state.write().unwrap() = Some(state.clone());
        Ok(())
    }
}
