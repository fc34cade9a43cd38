/// Pin operations: read-modify-write against the store, then broadcast

use crate::error::PinnerError;
use crate::notifier::{Notifier, notify_changed};
use crate::pinned::PinnedItem;
use crate::storage::{PinnedStore, StorageData};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned,
    AlreadyPinned,
}

impl PinOutcome {
    /// Feedback shown next to the control that triggered the pin
    pub fn feedback(&self) -> &'static str {
        match self {
            PinOutcome::Pinned => "Pinned to homepage",
            PinOutcome::AlreadyPinned => "Already pinned",
        }
    }
}

/// Current pinned list, fetched fresh
pub async fn load_pinned<S: PinnedStore>(store: &S) -> Result<Vec<PinnedItem>, PinnerError> {
    Ok(store.load().await?.pinned)
}

/// Append `item` unless its id is already pinned. Only a real change is
/// persisted and broadcast.
pub async fn pin<S: PinnedStore, N: Notifier>(
    store: &S,
    notifier: &N,
    item: PinnedItem,
) -> Result<PinOutcome, PinnerError> {
    let mut data = store.load().await?;
    let id = item.id.clone();

    if !data.pin(item) {
        return Ok(PinOutcome::AlreadyPinned);
    }

    store.save(&data).await?;
    info!("Pinned video {} ({} pinned)", id, data.len());
    notify_changed(notifier).await;

    Ok(PinOutcome::Pinned)
}

/// Remove `id` from the list. Returns false, without writing, if it was not
/// pinned.
pub async fn unpin<S: PinnedStore, N: Notifier>(
    store: &S,
    notifier: &N,
    id: &str,
) -> Result<bool, PinnerError> {
    let mut data = store.load().await?;

    if !data.unpin(id) {
        return Ok(false);
    }

    store.save(&data).await?;
    info!("Unpinned video {} ({} pinned)", id, data.len());
    notify_changed(notifier).await;

    Ok(true)
}

pub async fn clear_all<S: PinnedStore, N: Notifier>(store: &S, notifier: &N) -> Result<(), PinnerError> {
    store.save(&StorageData::new()).await?;
    info!("Cleared all pinned videos");
    notify_changed(notifier).await;
    Ok(())
}

/// Write an empty record if none exists yet. Returns true if it wrote.
pub async fn initialize<S: PinnedStore>(store: &S) -> Result<bool, PinnerError> {
    if store.fetch().await?.is_some() {
        return Ok(false);
    }
    store.save(&StorageData::new()).await?;
    Ok(true)
}
