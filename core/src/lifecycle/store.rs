use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use crate::error::{LifecycleError, Result};

/// Values published for the remainder of one property execution.
///
/// The store is owned by the property context and dropped with it, so
/// anything created here lives exactly as long as the property.
#[derive(Default)]
pub struct PropertyStore {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `value` under `key`
    pub fn create<T: Any + Send + Sync>(&mut self, key: &str, value: T) -> Result<()> {
        if self.entries.contains_key(key) {
            return Err(LifecycleError::DuplicateStoreEntry(key.to_string()));
        }
        self.entries.insert(key.to_string(), Box::new(value));
        Ok(())
    }

    /// Look up the value published under `key`
    pub fn get<T: Any>(&self, key: &str) -> Result<&T> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| LifecycleError::store_not_found(key))?;
        (**entry)
            .downcast_ref::<T>()
            .ok_or_else(|| LifecycleError::StoreTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut store = PropertyStore::new();
        store.create("answer", 42u32).unwrap();

        assert_eq!(store.get::<u32>("answer"), Ok(&42));
        assert!(store.contains("answer"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut store = PropertyStore::new();
        store.create("answer", 1u32).unwrap();

        assert_eq!(
            store.create("answer", 2u32),
            Err(LifecycleError::DuplicateStoreEntry("answer".to_string()))
        );
        assert_eq!(store.get::<u32>("answer"), Ok(&1));
    }

    #[test]
    fn test_missing_key() {
        let store = PropertyStore::new();
        assert_eq!(
            store.get::<u32>("missing"),
            Err(LifecycleError::StoreNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_type_mismatch() {
        let mut store = PropertyStore::new();
        store.create("answer", "forty-two").unwrap();

        let error = store.get::<u32>("answer").unwrap_err();
        assert_eq!(
            error,
            LifecycleError::StoreTypeMismatch {
                key: "answer".to_string(),
                expected: "u32",
            }
        );
    }
}
