/// JS bridge to the chrome.* extension APIs
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/chrome_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    pub async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn sendRuntimeMessage(message: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub fn addRuntimeListener(callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub fn removeRuntimeListener(callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub fn addStorageChangeListener(key: &str, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub fn removeStorageChangeListener(callback: &js_sys::Function) -> Result<(), JsValue>;
}
