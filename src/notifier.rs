/// Cross-context change broadcast
use crate::bridge;
use crate::error::{PinnerError, js_message};
use crate::storage::STORAGE_KEY;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

/// Messages exchanged between extension contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PinnerMessage {
    #[serde(rename = "pinned-updated")]
    PinnedUpdated,
}

#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn broadcast(&self, message: &PinnerMessage) -> Result<(), PinnerError>;
}

/// Broadcasts through chrome.runtime.sendMessage
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeNotifier;

impl Notifier for RuntimeNotifier {
    async fn broadcast(&self, message: &PinnerMessage) -> Result<(), PinnerError> {
        let message_js = serde_wasm_bindgen::to_value(message)?;

        bridge::sendRuntimeMessage(message_js)
            .await
            .map_err(|e| PinnerError::Broadcast(js_message(&e)))
    }
}

/// Notifier that records what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<PinnerMessage>>,
    fail: RefCell<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts fail as if nobody were listening
    pub fn unreachable() -> Self {
        let notifier = Self::default();
        *notifier.fail.borrow_mut() = true;
        notifier
    }

    pub fn sent(&self) -> Vec<PinnerMessage> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn broadcast(&self, message: &PinnerMessage) -> Result<(), PinnerError> {
        self.sent.borrow_mut().push(*message);
        if *self.fail.borrow() {
            return Err(PinnerError::Broadcast(
                "Could not establish connection. Receiving end does not exist.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tell other contexts the pinned list changed. Failure only affects
/// cross-tab freshness, so it is logged and dropped.
pub async fn notify_changed<N: Notifier>(notifier: &N) {
    if let Err(e) = notifier.broadcast(&PinnerMessage::PinnedUpdated).await {
        warn!("Could not notify other contexts: {}", e);
    }
}

/// Parse an incoming runtime message; anything unknown yields `None`
pub fn parse_message(value: JsValue) -> Option<PinnerMessage> {
    serde_wasm_bindgen::from_value(value).ok()
}

/// Keeps the registered JS callbacks alive; unregisters them on drop
pub struct ChangeListener {
    runtime: Closure<dyn FnMut(JsValue)>,
    storage: Closure<dyn FnMut()>,
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        let _ = bridge::removeRuntimeListener(self.runtime.as_ref().unchecked_ref());
        let _ = bridge::removeStorageChangeListener(self.storage.as_ref().unchecked_ref());
    }
}

/// Invoke `handler` whenever any context reports a pinned-list change, either
/// through a runtime message or a write to the synced record.
pub fn listen<F>(handler: F) -> Result<ChangeListener, PinnerError>
where
    F: Fn() + 'static,
{
    let handler = std::rc::Rc::new(handler);

    let on_message = {
        let handler = handler.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
            if parse_message(message) == Some(PinnerMessage::PinnedUpdated) {
                debug!("Received pinned-updated message");
                handler();
            }
        })
    };

    let on_storage = Closure::<dyn FnMut()>::new(move || {
        debug!("Pinned record changed in storage");
        handler();
    });

    bridge::addRuntimeListener(on_message.as_ref().unchecked_ref())
        .map_err(|e| PinnerError::from_js(&e))?;
    bridge::addStorageChangeListener(STORAGE_KEY, on_storage.as_ref().unchecked_ref())
        .map_err(|e| PinnerError::from_js(&e))?;

    Ok(ChangeListener {
        runtime: on_message,
        storage: on_storage,
    })
}
