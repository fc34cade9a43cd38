/// Pinned-item store backed by chrome.storage.sync
use crate::bridge;
use crate::error::PinnerError;
use crate::pinned::PinnedItem;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;

/// Key of the single persisted record
pub const STORAGE_KEY: &str = "pinned";

/// Root storage structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageData {
    #[serde(default)]
    pub pinned: Vec<PinnedItem>,
}

impl StorageData {
    pub fn new() -> Self {
        StorageData { pinned: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pinned.iter().any(|item| item.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&PinnedItem> {
        self.pinned.iter().find(|item| item.id == id)
    }

    /// Append an item. Returns false (and leaves the list alone) if the id is
    /// already pinned.
    pub fn pin(&mut self, item: PinnedItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.pinned.push(item);
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let original_len = self.pinned.len();
        self.pinned.retain(|item| item.id != id);
        self.pinned.len() < original_len
    }

    pub fn clear(&mut self) {
        self.pinned.clear();
    }

    /// Drop repeated ids, keeping the first occurrence
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.pinned.retain(|item| seen.insert(item.id.clone()));
    }

    /// Pinned items, most recently pinned first
    pub fn newest_first(&self) -> Vec<PinnedItem> {
        self.pinned.iter().rev().cloned().collect()
    }
}

/// Persisted, shared list of pinned items. Last write wins between contexts.
#[allow(async_fn_in_trait)]
pub trait PinnedStore {
    /// Raw read; `None` when the record has never been written
    async fn fetch(&self) -> Result<Option<StorageData>, PinnerError>;

    async fn save(&self, data: &StorageData) -> Result<(), PinnerError>;

    async fn load(&self) -> Result<StorageData, PinnerError> {
        let mut data = self.fetch().await?.unwrap_or_default();
        data.normalize();
        Ok(data)
    }
}

/// Store talking to chrome.storage.sync through the JS bridge
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeSyncStore;

impl PinnedStore for ChromeSyncStore {
    async fn fetch(&self) -> Result<Option<StorageData>, PinnerError> {
        let storage_js = bridge::getStorage(STORAGE_KEY)
            .await
            .map_err(|e| PinnerError::from_js(&e))?;

        if storage_js.is_null() || storage_js.is_undefined() {
            Ok(None)
        } else {
            Ok(Some(serde_wasm_bindgen::from_value(storage_js)?))
        }
    }

    async fn save(&self, data: &StorageData) -> Result<(), PinnerError> {
        let storage_js = serde_wasm_bindgen::to_value(data)?;

        bridge::setStorage(STORAGE_KEY, storage_js)
            .await
            .map_err(|e| PinnerError::from_js(&e))
    }
}

/// In-memory store for tests and pages without extension APIs
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<Option<StorageData>>,
    writes: RefCell<usize>,
    failure: RefCell<Option<PinnerError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<PinnedItem>) -> Self {
        let store = Self::default();
        *store.data.borrow_mut() = Some(StorageData { pinned: items });
        store
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: PinnerError) {
        *self.failure.borrow_mut() = Some(error);
    }

    pub fn snapshot(&self) -> Option<StorageData> {
        self.data.borrow().clone()
    }

    pub fn items(&self) -> Vec<PinnedItem> {
        self.snapshot().map(|d| d.pinned).unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    fn check(&self) -> Result<(), PinnerError> {
        match self.failure.borrow().as_ref() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl PinnedStore for MemoryStore {
    async fn fetch(&self) -> Result<Option<StorageData>, PinnerError> {
        self.check()?;
        Ok(self.data.borrow().clone())
    }

    async fn save(&self, data: &StorageData) -> Result<(), PinnerError> {
        self.check()?;
        *self.data.borrow_mut() = Some(data.clone());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
