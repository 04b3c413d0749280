//! Persistence gateway trait for the practice snapshot.
//!
//! The snapshot is the unit of persistence: stores hold at most one, and
//! every mutation saves the whole thing.

use std::sync::Arc;

use crate::core::PracticeState;
use crate::error::Result;

/// Trait for snapshot storage backends.
///
/// Absence is not an error: `load` returns `Ok(None)` when nothing has
/// been saved yet and the engine falls back to the default snapshot.
/// A present-but-unreadable snapshot is an error.
pub trait StateStore: Send + Sync {
    /// Load the stored snapshot, if any.
    fn load(&self) -> Result<Option<PracticeState>>;

    /// Save the snapshot, replacing any previous one.
    fn save(&self, state: &PracticeState) -> Result<()>;

    /// Check whether a snapshot has been saved.
    fn exists(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }
}

/// Blanket implementation of StateStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: StateStore` is expected, which is
/// how the engine shares one store with the snapshot writer.
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self) -> Result<Option<PracticeState>> {
        (**self).load()
    }

    fn save(&self, state: &PracticeState) -> Result<()> {
        (**self).save(state)
    }

    fn exists(&self) -> Result<bool> {
        (**self).exists()
    }
}
