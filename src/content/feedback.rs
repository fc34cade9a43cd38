/// Transient floating message shown after a pin action
use super::dom;
use crate::config::PinnerConfig;
use crate::error::PinnerError;
use gloo_timers::callback::Timeout;
use web_sys::HtmlElement;

/// Show `text` for a short while, replacing any message still on screen
pub fn flash_message(config: &PinnerConfig, text: &str) -> Result<(), PinnerError> {
    let document = dom::document()?;
    if let Some(existing) = document.get_element_by_id(&config.message_id) {
        existing.remove();
    }

    let message: HtmlElement = dom::create(&document, "div")?;
    message.set_id(&config.message_id);
    message.set_text_content(Some(text));
    dom::body(&document)?
        .append_child(&message)
        .map_err(dom::dom_err)?;

    Timeout::new(config.message_duration_ms, move || message.remove()).forget();
    Ok(())
}

/// Like `flash_message`, for callers with nowhere to send the error
pub fn flash(config: &PinnerConfig, text: &str) {
    if let Err(e) = flash_message(config, text) {
        log::warn!("Could not show message {:?}: {}", text, e);
    }
}
