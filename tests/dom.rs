//! Browser tests for the injected row and pin controls.
//! Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};
use yt_pinner::config::PinnerConfig;
use yt_pinner::content::observer::{MutationWatch, UrlWatch};
use yt_pinner::content::{ButtonState, ContentController, PinButtonInjector, RenderOutcome, RowRenderer};
use yt_pinner::notifier::{PinnerMessage, RecordingNotifier};
use yt_pinner::operations;
use yt_pinner::pinned::PinnedItem;
use yt_pinner::storage::MemoryStore;

wasm_bindgen_test_configure!(run_in_browser);

type Renderer = RowRenderer<MemoryStore, RecordingNotifier>;
type Injector = PinButtonInjector<MemoryStore, RecordingNotifier>;

const FRESH_FEED: &str =
    "<ytd-rich-item-renderer><a href=\"/watch?v=fresh\"></a><h3>Fresh</h3></ytd-rich-item-renderer>";

struct Fixture {
    store: Rc<MemoryStore>,
    notifier: Rc<RecordingNotifier>,
    config: Rc<PinnerConfig>,
    renderer: Rc<Renderer>,
}

fn fixture(items: Vec<PinnedItem>) -> Fixture {
    let document = document();
    document.body().unwrap().set_inner_html("");

    let store = Rc::new(MemoryStore::with_items(items));
    let notifier = Rc::new(RecordingNotifier::new());
    let config = Rc::new(PinnerConfig::default());
    let renderer = RowRenderer::new(store.clone(), notifier.clone(), config.clone());
    Fixture { store, notifier, config, renderer }
}

fn injector(f: &Fixture) -> Rc<Injector> {
    PinButtonInjector::new(
        f.store.clone(),
        f.notifier.clone(),
        f.config.clone(),
        f.renderer.clone(),
    )
}

/// Let spawned click handlers and observer callbacks run
async fn settle() {
    TimeoutFuture::new(50).await;
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn item(id: &str) -> PinnedItem {
    PinnedItem::from_video(id, &format!("Title {}", id))
}

fn row_count() -> u32 {
    document().query_selector_all("#yt-pinned-row").unwrap().length()
}

fn card_count() -> u32 {
    document().query_selector_all(".ytp-pinned-card").unwrap().length()
}

fn overlay_count() -> u32 {
    document().query_selector_all(".ytp-homepage-pin-btn").unwrap().length()
}

fn click_overlay() {
    let overlay: HtmlElement = document()
        .query_selector(".ytp-homepage-pin-btn")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    overlay.click();
}

#[wasm_bindgen_test]
async fn empty_store_renders_nothing() {
    let f = fixture(Vec::new());

    let outcome = f.renderer.render().await;

    assert_eq!(outcome, RenderOutcome::Empty);
    assert_eq!(row_count(), 0);
}

#[wasm_bindgen_test]
async fn repeated_renders_leave_one_row() {
    let f = fixture(vec![item("a"), item("b")]);

    let (first, second) = futures::join!(f.renderer.render(), f.renderer.render());
    f.renderer.render().await;

    assert!(matches!(first, RenderOutcome::Rendered { items: 2 }));
    assert!(matches!(second, RenderOutcome::Rendered { .. } | RenderOutcome::Skipped));
    assert_eq!(row_count(), 1);
    assert_eq!(card_count(), 2);
}

#[wasm_bindgen_test]
async fn row_is_inserted_before_feed_anchor() {
    let f = fixture(vec![item("a")]);
    let document = document();
    let body = document.body().unwrap();
    body.set_inner_html("<div id=\"primary\"><ytd-rich-grid-renderer></ytd-rich-grid-renderer></div>");

    f.renderer.render().await;

    let row = document.get_element_by_id("yt-pinned-row").unwrap();
    let next = row.next_element_sibling().unwrap();
    assert_eq!(next.tag_name().to_lowercase(), "ytd-rich-grid-renderer");
    assert_eq!(row.parent_element().unwrap().id(), "primary");
}

#[wasm_bindgen_test]
async fn row_falls_back_to_top_of_body() {
    let f = fixture(vec![item("a")]);
    let document = document();
    document.body().unwrap().set_inner_html("<p>existing</p>");

    f.renderer.render().await;

    let first = document.body().unwrap().first_element_child().unwrap();
    assert_eq!(first.id(), "yt-pinned-row");
}

#[wasm_bindgen_test]
async fn card_links_to_watch_page() {
    let f = fixture(vec![item("abc")]);

    f.renderer.render().await;

    let link = document().query_selector(".ytp-pinned-card a").unwrap().unwrap();
    assert_eq!(
        link.get_attribute("href").as_deref(),
        Some("https://www.youtube.com/watch?v=abc")
    );
    assert_eq!(link.get_attribute("target").as_deref(), Some("_blank"));
}

#[wasm_bindgen_test]
async fn unpin_rerenders_with_remaining_items() {
    let f = fixture(vec![item("a"), item("b")]);
    f.renderer.render().await;

    let removed = f.renderer.unpin("a").await.unwrap();

    assert!(removed);
    assert_eq!(f.store.items(), vec![item("b")]);
    assert_eq!(f.notifier.sent(), vec![PinnerMessage::PinnedUpdated]);
    assert_eq!(row_count(), 1);
    assert_eq!(card_count(), 1);
}

#[wasm_bindgen_test]
async fn clear_all_removes_row() {
    let f = fixture(vec![item("a"), item("b")]);
    f.renderer.render().await;

    operations::clear_all(&*f.store, &*f.notifier).await.unwrap();
    let outcome = f.renderer.render().await;

    assert_eq!(outcome, RenderOutcome::Empty);
    assert!(f.store.items().is_empty());
    assert_eq!(row_count(), 0);
}

#[wasm_bindgen_test]
async fn watch_button_waits_for_container() {
    let f = fixture(Vec::new());
    let injector = injector(&f);

    assert_eq!(injector.ensure_watch_button("abc").unwrap(), ButtonState::NoContainer);
    assert!(!injector.has_watch_button());

    document()
        .body()
        .unwrap()
        .set_inner_html("<div id=\"actions\"></div>");

    assert_eq!(injector.ensure_watch_button("abc").unwrap(), ButtonState::Inserted);
    assert_eq!(injector.ensure_watch_button("abc").unwrap(), ButtonState::AlreadyPresent);
    assert_eq!(document().query_selector_all("#ytp-pin-button").unwrap().length(), 1);

    injector.remove_watch_button();
    assert!(!injector.has_watch_button());
}

#[wasm_bindgen_test]
async fn feed_decoration_skips_pinned_and_decorated_items() {
    let f = fixture(vec![item("pinned")]);
    document().body().unwrap().set_inner_html(
        "<ytd-rich-item-renderer><a href=\"/watch?v=pinned\"></a></ytd-rich-item-renderer>\
         <ytd-rich-item-renderer><a href=\"/watch?v=fresh\"></a><h3>Fresh</h3></ytd-rich-item-renderer>\
         <ytd-rich-item-renderer><a href=\"/shorts/nope\"></a></ytd-rich-item-renderer>",
    );
    let injector = injector(&f);

    let first = injector.decorate_feed().await.unwrap();
    let second = injector.decorate_feed().await.unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 0);
    assert_eq!(document().query_selector_all(".ytp-homepage-pin-btn").unwrap().length(), 1);
}

#[wasm_bindgen_test]
async fn overlay_click_pins_and_renders_row() {
    let f = fixture(Vec::new());
    document().body().unwrap().set_inner_html(FRESH_FEED);
    let injector = injector(&f);
    assert_eq!(injector.decorate_feed().await.unwrap(), 1);

    click_overlay();
    settle().await;

    assert_eq!(f.store.items(), vec![PinnedItem::from_video("fresh", "Fresh")]);
    assert_eq!(f.notifier.sent(), vec![PinnerMessage::PinnedUpdated]);
    assert_eq!(row_count(), 1);
    assert_eq!(card_count(), 1);
    assert_eq!(overlay_count(), 0);
    assert_eq!(injector.overlay_count(), 0);
}

#[wasm_bindgen_test]
async fn unpinned_feed_item_gets_overlay_back() {
    let f = fixture(Vec::new());
    document().body().unwrap().set_inner_html(FRESH_FEED);
    let injector = injector(&f);
    injector.decorate_feed().await.unwrap();
    click_overlay();
    settle().await;
    assert_eq!(injector.decorate_feed().await.unwrap(), 0);

    f.renderer.unpin("fresh").await.unwrap();

    assert_eq!(injector.decorate_feed().await.unwrap(), 1);
    let host = document().query_selector("ytd-rich-item-renderer").unwrap().unwrap();
    assert!(host.query_selector(".ytp-homepage-pin-btn").unwrap().is_some());
}

#[wasm_bindgen_test]
async fn overlays_work_again_after_leaving_the_feed() {
    let f = fixture(Vec::new());
    document().body().unwrap().set_inner_html(FRESH_FEED);
    let injector = injector(&f);
    assert_eq!(injector.decorate_feed().await.unwrap(), 1);

    injector.reset_feed();
    assert_eq!(overlay_count(), 0);
    assert_eq!(injector.overlay_count(), 0);

    assert_eq!(injector.decorate_feed().await.unwrap(), 1);
    click_overlay();
    settle().await;

    assert_eq!(f.store.items(), vec![PinnedItem::from_video("fresh", "Fresh")]);
}

#[wasm_bindgen_test]
async fn overlay_goes_on_the_closest_feed_container() {
    let f = fixture(Vec::new());
    document().body().unwrap().set_inner_html(
        "<ytd-rich-item-renderer id=\"outer\"><ytd-grid-video-renderer>\
         <a href=\"/watch?v=nested\"></a></ytd-grid-video-renderer></ytd-rich-item-renderer>",
    );
    let injector = injector(&f);

    assert_eq!(injector.decorate_feed().await.unwrap(), 1);

    let overlay = document().query_selector(".ytp-homepage-pin-btn").unwrap().unwrap();
    assert_eq!(overlay.parent_element().unwrap().id(), "outer");
    assert_eq!(overlay_count(), 1);
}

#[wasm_bindgen_test]
async fn detached_overlays_are_forgotten() {
    let f = fixture(Vec::new());
    document().body().unwrap().set_inner_html(FRESH_FEED);
    let injector = injector(&f);
    injector.decorate_feed().await.unwrap();

    document().body().unwrap().set_inner_html("");
    injector.decorate_feed().await.unwrap();

    assert_eq!(injector.overlay_count(), 0);
}

#[wasm_bindgen_test]
fn controller_init_and_dispose_are_idempotent() {
    document().body().unwrap().set_inner_html("");
    let controller = ContentController::new(
        MemoryStore::new(),
        RecordingNotifier::new(),
        PinnerConfig::default(),
    );

    controller.init().unwrap();
    controller.init().unwrap();
    assert!(controller.is_active());

    controller.dispose();
    controller.dispose();
    assert!(!controller.is_active());
}

#[wasm_bindgen_test]
async fn mutation_watch_reports_marker_additions_until_dropped() {
    let document = document();
    let body = document.body().unwrap();
    body.set_inner_html("");
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let watch = MutationWatch::observe(&body, PinnerConfig::default().mutation_markers(), move || {
        counter.set(counter.get() + 1)
    })
    .unwrap();

    body.append_child(&document.create_element("p").unwrap()).unwrap();
    settle().await;
    assert_eq!(hits.get(), 0);

    let wrapper = document.create_element("div").unwrap();
    wrapper.set_inner_html("<ytd-rich-item-renderer></ytd-rich-item-renderer>");
    body.append_child(&wrapper).unwrap();
    settle().await;
    assert_eq!(hits.get(), 1);

    drop(watch);
    body.append_child(&document.create_element("ytd-browse").unwrap()).unwrap();
    settle().await;
    assert_eq!(hits.get(), 1);
}

#[wasm_bindgen_test]
async fn url_watch_reports_a_change_once() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let watch = UrlWatch::start(10, "https://www.youtube.com/".to_string(), move |href| {
        log.borrow_mut().push(href.to_string())
    });

    settle().await;
    drop(watch);

    let current = web_sys::window().unwrap().location().href().unwrap();
    assert_eq!(*seen.borrow(), vec![current]);
}

#[wasm_bindgen_test]
async fn storage_initialization_fails_outside_the_extension() {
    let err = yt_pinner::initialize_storage().await.unwrap_err();

    assert_eq!(err.as_string().as_deref(), Some("Extension context invalidated"));
}
