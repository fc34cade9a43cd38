/// The "Your Pinned Videos" row on the homepage

use super::{dom, feedback, style};
use crate::config::PinnerConfig;
use crate::error::PinnerError;
use crate::notifier::Notifier;
use crate::operations;
use crate::pinned::PinnedItem;
use crate::single_flight::SingleFlight;
use crate::storage::PinnedStore;
use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlImageElement, Node};

pub const CARD_CLASS: &str = "ytp-pinned-card";
const HEADING: &str = "📌 Your Pinned Videos";

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Another render was in flight
    Skipped,
    /// Nothing pinned, no row on the page
    Empty,
    Rendered { items: usize },
    Failed(PinnerError),
}

pub struct RowRenderer<S, N> {
    store: Rc<S>,
    notifier: Rc<N>,
    config: Rc<PinnerConfig>,
    in_flight: SingleFlight,
    listeners: RefCell<Vec<EventListener>>,
}

impl<S, N> RowRenderer<S, N>
where
    S: PinnedStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Rc<S>, notifier: Rc<N>, config: Rc<PinnerConfig>) -> Rc<Self> {
        Rc::new(RowRenderer {
            store,
            notifier,
            config,
            in_flight: SingleFlight::new(),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Rebuild the row from the store. Existing rows are removed first, so the
    /// page never holds more than one.
    pub async fn render(self: &Rc<Self>) -> RenderOutcome {
        let Some(_flight) = self.in_flight.try_begin() else {
            debug!("Render already in flight, dropping trigger");
            return RenderOutcome::Skipped;
        };

        let document = match dom::document() {
            Ok(document) => document,
            Err(e) => return RenderOutcome::Failed(e),
        };
        self.remove_rows(&document);

        let items = match operations::load_pinned(&*self.store).await {
            Ok(items) => items,
            Err(e) => {
                if e.is_context_invalidated() {
                    warn!("Extension context invalidated. Please reload the page.");
                } else {
                    warn!("Could not load pinned videos: {}", e);
                }
                return RenderOutcome::Failed(e);
            }
        };

        if items.is_empty() {
            return RenderOutcome::Empty;
        }

        // Something outside this renderer may have put a row back while the
        // store was being read.
        self.remove_rows(&document);

        match self.insert(&document, &items) {
            Ok(()) => {
                debug!("Rendered pinned row with {} videos", items.len());
                RenderOutcome::Rendered { items: items.len() }
            }
            Err(e) => {
                warn!("Could not render pinned row: {}", e);
                RenderOutcome::Failed(e)
            }
        }
    }

    /// Fire-and-forget render for timer and event callbacks
    pub fn render_later(self: &Rc<Self>) {
        let this = self.clone();
        spawn_local(async move {
            this.render().await;
        });
    }

    /// Remove `id` from the store, tell other contexts, redraw
    pub async fn unpin(self: &Rc<Self>, id: &str) -> Result<bool, PinnerError> {
        let removed = operations::unpin(&*self.store, &*self.notifier, id).await?;
        self.render().await;
        Ok(removed)
    }

    pub fn remove_rows(&self, document: &Document) -> usize {
        self.listeners.borrow_mut().clear();
        dom::remove_all(document, &format!("#{}", self.config.row_id))
    }

    fn insert(self: &Rc<Self>, document: &Document, items: &[PinnedItem]) -> Result<(), PinnerError> {
        dom::ensure_stylesheet(document, style::STYLESHEET_ID, style::STYLESHEET)?;
        let row = self.build(document, items)?;

        match dom::first_match(document, &self.config.row_anchors) {
            Some((selector, anchor)) => {
                debug!("Inserting pinned row before {}", selector);
                let parent = anchor
                    .parent_node()
                    .ok_or_else(|| PinnerError::Dom("anchor has no parent".to_string()))?;
                let anchor: &Node = &anchor;
                parent.insert_before(&row, Some(anchor)).map_err(dom::dom_err)?;
            }
            None => {
                let body = dom::body(document)?;
                let first = body.first_child();
                body.insert_before(&row, first.as_ref()).map_err(dom::dom_err)?;
            }
        }
        Ok(())
    }

    fn build(self: &Rc<Self>, document: &Document, items: &[PinnedItem]) -> Result<HtmlElement, PinnerError> {
        let wrapper: HtmlElement = dom::create(document, "div")?;
        wrapper.set_id(&self.config.row_id);

        let heading: HtmlElement = dom::create(document, "h2")?;
        heading.set_text_content(Some(HEADING));
        wrapper.append_child(&heading).map_err(dom::dom_err)?;

        let list: HtmlElement = dom::create(document, "div")?;
        list.set_class_name("ytp-pinned-list");
        for item in items {
            let card = self.build_card(document, item)?;
            list.append_child(&card).map_err(dom::dom_err)?;
        }
        wrapper.append_child(&list).map_err(dom::dom_err)?;

        Ok(wrapper)
    }

    fn build_card(self: &Rc<Self>, document: &Document, item: &PinnedItem) -> Result<HtmlElement, PinnerError> {
        let card: HtmlElement = dom::create(document, "div")?;
        card.set_class_name(CARD_CLASS);
        card.set_attribute("data-video-id", &item.id).map_err(dom::dom_err)?;

        let link: HtmlAnchorElement = dom::create(document, "a")?;
        link.set_href(&item.watch_url());
        link.set_target("_blank");

        let thumb: HtmlImageElement = dom::create(document, "img")?;
        thumb.set_src(&item.thumbnail);
        thumb.set_alt(&item.title);
        thumb.set_width(220);

        let title: HtmlElement = dom::create(document, "div")?;
        title.set_class_name("ytp-pinned-title");
        title.set_text_content(Some(&item.title));

        link.append_child(&thumb).map_err(dom::dom_err)?;
        link.append_child(&title).map_err(dom::dom_err)?;

        let unpin: HtmlButtonElement = dom::create(document, "button")?;
        unpin.set_class_name("ytp-unpin-btn");
        unpin.set_type("button");
        unpin.set_title("Unpin this video");
        unpin.set_text_content(Some("❌"));
        self.listeners
            .borrow_mut()
            .push(self.unpin_listener(&unpin, item.id.clone()));

        card.append_child(&link).map_err(dom::dom_err)?;
        card.append_child(&unpin).map_err(dom::dom_err)?;
        Ok(card)
    }

    fn unpin_listener(self: &Rc<Self>, button: &HtmlButtonElement, id: String) -> EventListener {
        let weak: Weak<Self> = Rc::downgrade(self);
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
                let id = id.clone();
                spawn_local(async move {
                    match this.unpin(&id).await {
                        Ok(true) => info!("Unpinned {} from the homepage row", id),
                        Ok(false) => debug!("{} was already unpinned", id),
                        Err(e) => {
                            warn!("Unpin failed: {}", e);
                            feedback::flash(&this.config, e.user_message());
                        }
                    }
                });
            },
        )
    }
}
