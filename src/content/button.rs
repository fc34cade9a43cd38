/// Pin controls: the watch page action-bar button and the homepage overlays

use super::row::RowRenderer;
use super::{dom, feedback, style};
use crate::config::PinnerConfig;
use crate::error::PinnerError;
use crate::notifier::Notifier;
use crate::operations::{self, PinOutcome};
use crate::page;
use crate::pinned::PinnedItem;
use crate::single_flight::SingleFlight;
use crate::storage::PinnedStore;
use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

const UNKNOWN_TITLE: &str = "Unknown Video";

/// Where the watch page button stands after an `ensure_watch_button` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    AlreadyPresent,
    Inserted,
    /// The action bar has not been rendered yet
    NoContainer,
}

impl ButtonState {
    pub fn is_present(&self) -> bool {
        !matches!(self, ButtonState::NoContainer)
    }
}

/// A feed overlay and the click handler that keeps it alive
struct Overlay {
    button: HtmlButtonElement,
    _listener: EventListener,
}

pub struct PinButtonInjector<S, N> {
    store: Rc<S>,
    notifier: Rc<N>,
    config: Rc<PinnerConfig>,
    renderer: Rc<RowRenderer<S, N>>,
    watch_listener: RefCell<Option<EventListener>>,
    overlays: RefCell<Vec<Overlay>>,
    decorating: SingleFlight,
}

impl<S, N> PinButtonInjector<S, N>
where
    S: PinnedStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        store: Rc<S>,
        notifier: Rc<N>,
        config: Rc<PinnerConfig>,
        renderer: Rc<RowRenderer<S, N>>,
    ) -> Rc<Self> {
        Rc::new(PinButtonInjector {
            store,
            notifier,
            config,
            renderer,
            watch_listener: RefCell::new(None),
            overlays: RefCell::new(Vec::new()),
            decorating: SingleFlight::new(),
        })
    }

    pub fn has_watch_button(&self) -> bool {
        dom::document()
            .map(|document| document.get_element_by_id(&self.config.watch_button_id).is_some())
            .unwrap_or(false)
    }

    /// Drop the watch page button so the next page gets a fresh one
    pub fn remove_watch_button(&self) {
        if let Ok(document) = dom::document() {
            if let Some(existing) = document.get_element_by_id(&self.config.watch_button_id) {
                existing.remove();
            }
        }
        self.watch_listener.borrow_mut().take();
    }

    /// Take every overlay off the page together with its listener; the hidden
    /// feed outlives navigation and must come back undecorated
    pub fn reset_feed(&self) {
        for overlay in self.overlays.borrow_mut().drain(..) {
            overlay.button.remove();
        }
    }

    /// Overlays currently on the page with a live click handler
    pub fn overlay_count(&self) -> usize {
        self.overlays.borrow().len()
    }

    fn drop_overlay(&self, button: &HtmlButtonElement) {
        button.remove();
        self.overlays.borrow_mut().retain(|overlay| overlay.button != *button);
    }

    /// Forget overlays whose feed item has been discarded by the page
    fn prune_detached(&self) {
        self.overlays
            .borrow_mut()
            .retain(|overlay| overlay.button.is_connected());
    }

    fn is_decorated(&self, host: &Element) -> bool {
        dom::query_in(host, &self.config.feed_button_selector()).is_some()
    }

    /// Put the pin button into the action bar of the watch page for
    /// `video_id`, unless it is already there
    pub fn ensure_watch_button(self: &Rc<Self>, video_id: &str) -> Result<ButtonState, PinnerError> {
        let document = dom::document()?;
        if document.get_element_by_id(&self.config.watch_button_id).is_some() {
            return Ok(ButtonState::AlreadyPresent);
        }

        let Some((selector, container)) = dom::first_match(&document, &self.config.action_containers) else {
            debug!("No action container yet for video {}", video_id);
            return Ok(ButtonState::NoContainer);
        };
        debug!("Found action container with selector {}", selector);

        dom::ensure_stylesheet(&document, style::STYLESHEET_ID, style::STYLESHEET)?;

        let button: HtmlButtonElement = dom::create(&document, "button")?;
        button.set_id(&self.config.watch_button_id);
        button.set_type("button");
        button.set_text_content(Some("📌 Pin Video"));

        let weak = Rc::downgrade(self);
        let id = video_id.to_string();
        let listener = EventListener::new(&button, "click", move |_| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            let id = id.clone();
            spawn_local(async move {
                this.pin_from_watch_page(&id).await;
            });
        });

        container.append_child(&button).map_err(dom::dom_err)?;
        *self.watch_listener.borrow_mut() = Some(listener);
        info!("Pin button added for video {}", video_id);
        Ok(ButtonState::Inserted)
    }

    async fn pin_from_watch_page(&self, video_id: &str) {
        let title = dom::document()
            .map(|document| page::clean_document_title(&document.title()))
            .unwrap_or_default();
        let item = PinnedItem::from_video(video_id, &title);

        match operations::pin(&*self.store, &*self.notifier, item).await {
            Ok(outcome) => feedback::flash(&self.config, outcome.feedback()),
            Err(e) => {
                error!("Pin failed for {}: {}", video_id, e);
                feedback::flash(&self.config, e.user_message());
            }
        }
    }

    /// Attach an overlay pin button to every feed item that is neither pinned
    /// nor decorated yet. Returns how many overlays were added.
    pub async fn decorate_feed(self: &Rc<Self>) -> Result<usize, PinnerError> {
        let Some(_flight) = self.decorating.try_begin() else {
            return Ok(0);
        };

        self.prune_detached();

        let document = dom::document()?;
        let items = dom::query_all(&document, &self.config.feed_item_selector());
        let total = items.len();
        let candidates: Vec<(Element, String)> = items
            .into_iter()
            .filter_map(|element| {
                let id = self.feed_item_video_id(&element)?;
                Some((self.overlay_host(element), id))
            })
            .filter(|(host, _)| !self.is_decorated(host))
            .collect();

        if candidates.is_empty() {
            return Ok(0);
        }

        let pinned = self.store.load().await?;
        dom::ensure_stylesheet(&document, style::STYLESHEET_ID, style::STYLESHEET)?;

        let mut added = 0;
        for (host, id) in candidates {
            // The page may have moved on while the store was read. Nested
            // feed items also share a host.
            if pinned.contains(&id) || self.is_decorated(&host) || !host.is_connected() {
                continue;
            }
            self.attach_overlay(&document, &host, &id)?;
            added += 1;
        }

        if added > 0 {
            debug!(
                "Found {} videos, added {} new pin buttons ({} live)",
                total,
                added,
                self.overlay_count()
            );
        }
        Ok(added)
    }

    /// Fire-and-forget `decorate_feed`
    pub fn decorate_later(self: &Rc<Self>) {
        let this = self.clone();
        spawn_local(async move {
            if let Err(e) = this.decorate_feed().await {
                debug!("Feed decoration skipped: {}", e);
            }
        });
    }

    fn feed_item_video_id(&self, element: &Element) -> Option<String> {
        let link = dom::query_in(element, &self.config.feed_item_link)?;
        let href = link.get_attribute("href")?;
        page::video_id_from_href(&href)
    }

    /// The feed item container the overlay belongs in
    fn overlay_host(&self, element: Element) -> Element {
        element
            .closest(&self.config.feed_container_selector())
            .ok()
            .flatten()
            .unwrap_or(element)
    }

    fn feed_item_title(&self, element: &Element) -> String {
        dom::query_in(element, &self.config.feed_item_title)
            .and_then(|title| title.text_content())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    fn attach_overlay(self: &Rc<Self>, document: &Document, host: &Element, video_id: &str) -> Result<(), PinnerError> {
        let button: HtmlButtonElement = dom::create(document, "button")?;
        button.set_class_name(&self.config.feed_button_class);
        button.set_type("button");
        button.set_title("Pin this video");
        button.set_text_content(Some("📌"));

        let listener = self.overlay_listener(&button, host.clone(), video_id.to_string());

        if let Some(host) = host.dyn_ref::<HtmlElement>() {
            host.style().set_property("position", "relative").map_err(dom::dom_err)?;
        }
        host.append_child(&button).map_err(dom::dom_err)?;
        self.overlays.borrow_mut().push(Overlay {
            button,
            _listener: listener,
        });
        Ok(())
    }

    fn overlay_listener(self: &Rc<Self>, button: &HtmlButtonElement, host: Element, video_id: String) -> EventListener {
        let weak: Weak<Self> = Rc::downgrade(self);
        let overlay = button.clone();
        EventListener::new_with_options(
            button,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                event.stop_propagation();

                let Some(this) = weak.upgrade() else {
                    return;
                };
                let title = this.feed_item_title(&host);
                let item = PinnedItem::from_video(&video_id, &title);
                let overlay = overlay.clone();
                spawn_local(async move {
                    match operations::pin(&*this.store, &*this.notifier, item).await {
                        Ok(outcome) => {
                            let text = match outcome {
                                PinOutcome::Pinned => "Video pinned!",
                                PinOutcome::AlreadyPinned => outcome.feedback(),
                            };
                            feedback::flash(&this.config, text);
                            this.drop_overlay(&overlay);
                            this.renderer.render().await;
                        }
                        Err(e) => {
                            error!("Pin from feed failed: {}", e);
                            feedback::flash(&this.config, e.user_message());
                        }
                    }
                });
            },
        )
    }
}
