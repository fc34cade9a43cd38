/// Error types shared by the store, notifier and page scripts
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PinnerError {
    #[error("Extension context invalidated")]
    ContextInvalidated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl PinnerError {
    /// Classify a bridge failure message. Chrome reports a torn down
    /// extension as "Extension context invalidated."
    pub fn from_message(message: &str) -> PinnerError {
        if message.to_lowercase().contains("context invalidated") {
            PinnerError::ContextInvalidated
        } else {
            PinnerError::Storage(message.to_string())
        }
    }

    pub fn from_js(value: &JsValue) -> PinnerError {
        PinnerError::from_message(&js_message(value))
    }

    pub fn is_context_invalidated(&self) -> bool {
        matches!(self, PinnerError::ContextInvalidated)
    }

    /// Short text for the inline feedback shown on the page
    pub fn user_message(&self) -> &'static str {
        match self {
            PinnerError::ContextInvalidated => "Extension error - please reload page",
            _ => "Something went wrong - try again",
        }
    }
}

impl From<serde_wasm_bindgen::Error> for PinnerError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        PinnerError::Serialization(e.to_string())
    }
}

/// Best-effort text of a thrown JS value (Error.message, a string, or Debug)
pub fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
