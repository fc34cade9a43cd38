/// Per-tab owner of everything the content script keeps alive

use super::button::PinButtonInjector;
use super::dom;
use super::observer::{Debouncer, MutationWatch, UrlWatch};
use super::row::RowRenderer;
use crate::config::PinnerConfig;
use crate::error::PinnerError;
use crate::notifier::{self, ChangeListener, Notifier};
use crate::page::PageKind;
use crate::retry::{RetryOutcome, browser_sleep, retry_until};
use crate::storage::PinnedStore;
use gloo_events::EventListener;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;

/// Lifecycle: `init()` wires the triggers, `dispose()` tears all of them down.
pub struct ContentController<S, N> {
    inner: Rc<Inner<S, N>>,
}

struct Inner<S, N> {
    config: Rc<PinnerConfig>,
    renderer: Rc<RowRenderer<S, N>>,
    injector: Rc<PinButtonInjector<S, N>>,

    active: Cell<bool>,
    /// Bumped on every navigation and on dispose; monitors started under an
    /// older value stop at their next check
    generation: Cell<u64>,

    mutation_watch: RefCell<Option<MutationWatch>>,
    url_watch: RefCell<Option<UrlWatch>>,
    scroll_listener: RefCell<Option<EventListener>>,
    change_listener: RefCell<Option<ChangeListener>>,

    mutation_debounce: Debouncer,
    scroll_debounce: Debouncer,
    change_delay: Debouncer,
    setup_delay: Debouncer,
}

impl<S, N> ContentController<S, N>
where
    S: PinnedStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: S, notifier: N, config: PinnerConfig) -> Self {
        let store = Rc::new(store);
        let notifier = Rc::new(notifier);
        let config = Rc::new(config);
        let renderer = RowRenderer::new(store.clone(), notifier.clone(), config.clone());
        let injector = PinButtonInjector::new(store, notifier, config.clone(), renderer.clone());

        ContentController {
            inner: Rc::new(Inner {
                config,
                renderer,
                injector,
                active: Cell::new(false),
                generation: Cell::new(0),
                mutation_watch: RefCell::new(None),
                url_watch: RefCell::new(None),
                scroll_listener: RefCell::new(None),
                change_listener: RefCell::new(None),
                mutation_debounce: Debouncer::new(),
                scroll_debounce: Debouncer::new(),
                change_delay: Debouncer::new(),
                setup_delay: Debouncer::new(),
            }),
        }
    }

    pub fn init(&self) -> Result<(), PinnerError> {
        let inner = &self.inner;
        if inner.active.get() {
            return Ok(());
        }
        info!("Content script loaded");

        let document = dom::document()?;
        let body = dom::body(&document)?;
        let window = dom::window()?;
        let href = dom::current_href()?;

        let weak = Rc::downgrade(inner);
        let mutation_watch = MutationWatch::observe(&body, inner.config.mutation_markers(), move || {
            with_inner(&weak, |inner| inner.on_relevant_mutation());
        })?;

        let weak = Rc::downgrade(inner);
        let url_watch = UrlWatch::start(inner.config.url_poll_ms, href, move |_| {
            with_inner(&weak, |inner| inner.setup_current_page(false));
        });

        let weak = Rc::downgrade(inner);
        let scroll_listener = EventListener::new(&window, "scroll", move |_| {
            with_inner(&weak, |inner| inner.on_scroll());
        });

        let weak = Rc::downgrade(inner);
        match notifier::listen(move || with_inner(&weak, |inner| inner.on_pinned_changed())) {
            Ok(listener) => *inner.change_listener.borrow_mut() = Some(listener),
            Err(e) => warn!("Cross-tab updates unavailable: {}", e),
        }

        *inner.mutation_watch.borrow_mut() = Some(mutation_watch);
        *inner.url_watch.borrow_mut() = Some(url_watch);
        *inner.scroll_listener.borrow_mut() = Some(scroll_listener);
        inner.active.set(true);

        inner.setup_current_page(true);
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    pub fn dispose(&self) {
        let inner = &self.inner;
        if !inner.active.replace(false) {
            return;
        }
        inner.generation.set(inner.generation.get() + 1);

        inner.mutation_watch.borrow_mut().take();
        inner.url_watch.borrow_mut().take();
        inner.scroll_listener.borrow_mut().take();
        inner.change_listener.borrow_mut().take();
        inner.mutation_debounce.cancel();
        inner.scroll_debounce.cancel();
        inner.change_delay.cancel();
        inner.setup_delay.cancel();
        inner.injector.reset_feed();
        info!("Content script disposed");
    }
}

fn with_inner<S, N, F>(weak: &Weak<Inner<S, N>>, f: F)
where
    F: FnOnce(&Rc<Inner<S, N>>),
{
    if let Some(inner) = weak.upgrade() {
        if inner.active.get() {
            f(&inner);
        }
    }
}

fn current_page() -> PageKind {
    dom::current_href()
        .map(|href| PageKind::from_url(&href))
        .unwrap_or(PageKind::Other)
}

impl<S, N> Inner<S, N>
where
    S: PinnedStore + 'static,
    N: Notifier + 'static,
{
    /// Run the setup for whatever page we are on now. `initial` is the first
    /// run after the script loaded; later runs follow a navigation.
    fn setup_current_page(self: &Rc<Self>, initial: bool) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        match current_page() {
            PageKind::Home => {
                let delay = if initial {
                    self.config.initial_home_delay_ms
                } else {
                    self.config.navigation_home_delay_ms
                };
                info!("On homepage, rendering pinned videos and adding pin buttons");
                let weak = Rc::downgrade(self);
                self.setup_delay.schedule(delay, move || {
                    with_inner(&weak, |inner| inner.refresh_home());
                });
                self.start_feed_polling(generation);
            }
            PageKind::Watch { video_id } => {
                info!("On video page {}, starting button monitoring", video_id);
                self.setup_delay.cancel();
                self.injector.reset_feed();
                if !initial {
                    self.injector.remove_watch_button();
                }
                self.start_button_monitor(generation, video_id);
            }
            PageKind::Other => {
                debug!("Not on a homepage or video page");
                self.setup_delay.cancel();
                self.injector.reset_feed();
            }
        }
    }

    fn refresh_home(&self) {
        self.renderer.render_later();
        self.injector.decorate_later();
    }

    fn on_relevant_mutation(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.mutation_debounce
            .schedule(self.config.mutation_debounce_ms, move || {
                with_inner(&weak, |inner| match current_page() {
                    PageKind::Home => {
                        debug!("Homepage mutation detected");
                        inner.refresh_home();
                    }
                    PageKind::Watch { video_id } => {
                        if !inner.injector.has_watch_button() {
                            debug!("Video page mutation detected, attempting button insertion");
                            if let Err(e) = inner.injector.ensure_watch_button(&video_id) {
                                debug!("Button insertion failed: {}", e);
                            }
                        }
                    }
                    PageKind::Other => {}
                });
            });
    }

    fn on_scroll(self: &Rc<Self>) {
        if !current_page().is_home() {
            return;
        }
        let weak = Rc::downgrade(self);
        self.scroll_debounce
            .schedule(self.config.scroll_debounce_ms, move || {
                with_inner(&weak, |inner| {
                    debug!("Scroll settled, checking for new videos");
                    inner.injector.decorate_later();
                });
            });
    }

    fn on_pinned_changed(self: &Rc<Self>) {
        if !current_page().is_home() {
            return;
        }
        let weak = Rc::downgrade(self);
        self.change_delay
            .schedule(self.config.change_render_delay_ms, move || {
                with_inner(&weak, |inner| {
                    inner.renderer.render_later();
                    // An unpinned feed item gets its overlay back
                    inner.injector.decorate_later();
                });
            });
    }

    /// True once this monitor has been superseded by a navigation or dispose
    fn superseded(&self, generation: u64) -> bool {
        !self.active.get() || self.generation.get() != generation
    }

    fn start_button_monitor(self: &Rc<Self>, generation: u64, video_id: String) {
        let policy = self.config.watch_button_retry.clone();
        let stop_weak = Rc::downgrade(self);
        let attempt_weak = Rc::downgrade(self);
        let stop_video = video_id.clone();

        spawn_local(async move {
            let outcome = retry_until(
                &policy,
                browser_sleep,
                || match stop_weak.upgrade() {
                    Some(inner) => {
                        inner.superseded(generation)
                            || current_page().video_id() != Some(stop_video.as_str())
                    }
                    None => true,
                },
                |attempt| {
                    let Some(inner) = attempt_weak.upgrade() else {
                        return true;
                    };
                    if attempt % 10 == 0 {
                        debug!("Button monitoring attempt {}", attempt);
                    }
                    match inner.injector.ensure_watch_button(&video_id) {
                        Ok(state) => state.is_present(),
                        Err(e) => {
                            debug!("Button insertion failed: {}", e);
                            false
                        }
                    }
                },
            )
            .await;

            match outcome {
                RetryOutcome::Satisfied { attempts } => {
                    info!("Pin button present after {} attempts, stopping monitoring", attempts)
                }
                RetryOutcome::Abandoned { attempts } => {
                    debug!("Left video page after {} attempts, stopping monitoring", attempts)
                }
                RetryOutcome::Exhausted { attempts } => {
                    info!("Max monitoring attempts reached ({}), stopping", attempts)
                }
            }
        });
    }

    /// Keep decorating new feed items for a while after landing on the
    /// homepage; lazy loading adds them without a navigation
    fn start_feed_polling(self: &Rc<Self>, generation: u64) {
        let policy = self.config.feed_decoration_retry.clone();
        let stop_weak = Rc::downgrade(self);
        let attempt_weak = Rc::downgrade(self);

        spawn_local(async move {
            let outcome = retry_until(
                &policy,
                browser_sleep,
                || match stop_weak.upgrade() {
                    Some(inner) => inner.superseded(generation) || !current_page().is_home(),
                    None => true,
                },
                |_| {
                    if let Some(inner) = attempt_weak.upgrade() {
                        inner.injector.decorate_later();
                    }
                    false
                },
            )
            .await;

            if let RetryOutcome::Exhausted { .. } = outcome {
                debug!("Max homepage video checks reached");
            }
        });
    }
}
