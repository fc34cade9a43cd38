/// Triggers that notice the host page changing under us: DOM mutations and
/// client-side navigation
use super::dom;
use crate::error::PinnerError;
use gloo_timers::callback::{Interval, Timeout};
use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

/// Runs the latest scheduled task once things go quiet. Scheduling again
/// before the delay elapses cancels the pending task.
#[derive(Default)]
pub struct Debouncer {
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&self, delay_ms: u32, task: F)
    where
        F: FnOnce() + 'static,
    {
        *self.pending.borrow_mut() = Some(Timeout::new(delay_ms, task));
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

/// Subtree observer on the page body; disconnects on drop
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl MutationWatch {
    /// Call `on_relevant` for every mutation batch that adds an element
    /// matching (or containing) one of `markers`
    pub fn observe<F>(target: &Node, markers: String, on_relevant: F) -> Result<MutationWatch, PinnerError>
    where
        F: Fn() + 'static,
    {
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                if batch_is_relevant(&records, &markers) {
                    on_relevant();
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(dom::dom_err)?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(target, &options)
            .map_err(dom::dom_err)?;

        Ok(MutationWatch {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn batch_is_relevant(records: &js_sys::Array, markers: &str) -> bool {
    records
        .iter()
        .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
        .any(|record| {
            let added = record.added_nodes();
            (0..added.length())
                .filter_map(|i| added.get(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .any(|element| dom::matches_or_contains(&element, markers))
        })
}

/// Polls `location.href` and reports in-app navigations the page never
/// announces
pub struct UrlWatch {
    _interval: Interval,
}

impl UrlWatch {
    pub fn start<F>(period_ms: u32, initial: String, on_change: F) -> UrlWatch
    where
        F: Fn(&str) + 'static,
    {
        let last_seen = Rc::new(RefCell::new(initial));
        let interval = Interval::new(period_ms, move || {
            let Ok(current) = dom::current_href() else {
                return;
            };
            let previous = last_seen.replace(current.clone());
            if previous != current {
                info!("URL changed from {} to {}", previous, current);
                on_change(&current);
            }
        });
        UrlWatch { _interval: interval }
    }
}
