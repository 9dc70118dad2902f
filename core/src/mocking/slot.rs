use parking_lot::{RwLock, RwLockWriteGuard};
use std::sync::Arc;

use super::Mock;

/// Field holding a mock that the mocking session creates.
///
/// Register it with the `Mock` or `Spy` marker. It starts empty and is
/// filled with `M::default()` when a session opens over the owning test
/// instance. A slot can also be pre-filled or swapped by the
/// test itself.
pub struct MockSlot<M> {
    inner: RwLock<Option<Arc<M>>>,
}

impl<M> Default for MockSlot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MockSlot<M> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Create a slot already holding `mock`
    pub fn with_mock(mock: Arc<M>) -> Self {
        Self {
            inner: RwLock::new(Some(mock)),
        }
    }

    /// Current mock, if the slot has been filled
    pub fn get(&self) -> Option<Arc<M>> {
        self.inner.read().clone()
    }

    /// Current mock.
    ///
    /// # Panics
    ///
    /// Panics if no session has initialized the slot yet.
    pub fn mock(&self) -> Arc<M> {
        match self.get() {
            Some(mock) => mock,
            None => panic!(
                "mock slot of {} is empty; open a mocking session first",
                std::any::type_name::<M>()
            ),
        }
    }

    /// Swap the held mock, returning the previous one
    pub fn replace(&self, mock: Arc<M>) -> Option<Arc<M>> {
        self.inner.write().replace(mock)
    }

    /// Exclusive access to the slot; readers are denied while the guard lives
    pub fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<M>>> {
        self.inner.write()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Shared read that fails instead of blocking when a writer holds the slot
    pub(crate) fn try_get(&self) -> Option<Option<Arc<M>>> {
        self.inner.try_read().map(|guard| guard.clone())
    }
}

impl<M: Mock + Default> MockSlot<M> {
    /// Fill the slot with a fresh mock unless it already holds one.
    ///
    /// Returns `true` if a mock was created. A slot that is locked elsewhere
    /// is left alone.
    pub fn init(&self) -> bool {
        let Some(mut guard) = self.inner.try_write() else {
            return false;
        };
        if guard.is_some() {
            return false;
        }
        *guard = Some(Arc::new(M::default()));
        true
    }
}
