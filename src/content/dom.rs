/// Small helpers over web-sys for the content script
use crate::error::{PinnerError, js_message};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Result<Window, PinnerError> {
    web_sys::window().ok_or_else(|| PinnerError::Dom("no window".to_string()))
}

pub fn document() -> Result<Document, PinnerError> {
    window()?
        .document()
        .ok_or_else(|| PinnerError::Dom("no document".to_string()))
}

pub fn body(document: &Document) -> Result<HtmlElement, PinnerError> {
    document
        .body()
        .ok_or_else(|| PinnerError::Dom("no body".to_string()))
}

pub fn current_href() -> Result<String, PinnerError> {
    window()?
        .location()
        .href()
        .map_err(|e| PinnerError::Dom(js_message(&e)))
}

pub fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, PinnerError> {
    document
        .create_element(tag)
        .map_err(|e| PinnerError::Dom(js_message(&e)))?
        .dyn_into::<T>()
        .map_err(|_| PinnerError::Dom(format!("<{}> has an unexpected type", tag)))
}

pub fn dom_err(e: wasm_bindgen::JsValue) -> PinnerError {
    PinnerError::Dom(js_message(&e))
}

/// First element matching `selector`; an invalid selector counts as no match
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_in(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element matched by the ordered selector list, with the selector that
/// found it
pub fn first_match<'a>(document: &Document, selectors: &'a [String]) -> Option<(&'a str, Element)> {
    selectors
        .iter()
        .find_map(|selector| query(document, selector).map(|el| (selector.as_str(), el)))
}

/// Remove every element matching `selector`; returns how many went
pub fn remove_all(document: &Document, selector: &str) -> usize {
    let found = query_all(document, selector);
    for element in &found {
        element.remove();
    }
    found.len()
}

/// Does `element` match `selector` itself or contain a match
pub fn matches_or_contains(element: &Element, selector: &str) -> bool {
    element.matches(selector).unwrap_or(false) || query_in(element, selector).is_some()
}

/// Install a `<style>` block once per document
pub fn ensure_stylesheet(document: &Document, id: &str, css: &str) -> Result<(), PinnerError> {
    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let style: HtmlElement = create(document, "style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    let root = document
        .document_element()
        .ok_or_else(|| PinnerError::Dom("no document element".to_string()))?;
    root.append_child(&style).map_err(dom_err)?;
    Ok(())
}
