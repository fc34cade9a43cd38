/// YouTube Pinner - Chrome Extension that pins videos to the homepage
/// Built with Rust + WASM + Yew

pub mod bridge;
pub mod config;
pub mod content;
pub mod error;
pub mod notifier;
pub mod operations;
pub mod page;
pub mod pinned;
pub mod retry;
pub mod single_flight;
pub mod storage;
pub mod ui;

use config::PinnerConfig;
use content::ContentController;
use notifier::RuntimeNotifier;
use storage::ChromeSyncStore;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Handle the loader keeps for the lifetime of the tab
#[wasm_bindgen]
pub struct ContentScript {
    controller: ContentController<ChromeSyncStore, RuntimeNotifier>,
}

#[wasm_bindgen]
impl ContentScript {
    pub fn dispose(&self) {
        self.controller.dispose();
    }
}

// Start the content script on a host page
#[wasm_bindgen]
pub fn start_content_script() -> Result<ContentScript, JsValue> {
    let controller = ContentController::new(ChromeSyncStore, RuntimeNotifier, PinnerConfig::default());
    controller
        .init()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(ContentScript { controller })
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Background worker: make sure the pinned record exists after install.
// The worker registers `onInstalled` itself and calls this once the module
// has loaded; resolves to true when an empty list was written.
#[wasm_bindgen]
pub async fn initialize_storage() -> Result<bool, JsValue> {
    match operations::initialize(&ChromeSyncStore).await {
        Ok(written) => {
            if written {
                log::info!("Initialized empty pinned list");
            }
            Ok(written)
        }
        Err(e) => {
            log::warn!("Could not initialize storage: {}", e);
            Err(JsValue::from_str(&e.to_string()))
        }
    }
}
