/// Popup UI: every pinned video, newest first, with unpin and clear all

use crate::notifier::RuntimeNotifier;
use crate::operations;
use crate::pinned::PinnedItem;
use crate::storage::{ChromeSyncStore, PinnedStore};
use crate::ui::components::{NoPinsMessage, PinnedVideoCard};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const LOAD_ERROR: &str = "Extension error. Please reload.";

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Idle,
    Busy(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let pinned = use_state(Vec::<PinnedItem>::new);

    // Load the list on mount
    {
        let state = state.clone();
        let pinned = pinned.clone();
        use_effect_with((), move |_| {
            spawn_local(refresh(state, pinned));
            || ()
        });
    }

    let on_unpin = {
        let state = state.clone();
        let pinned = pinned.clone();

        Callback::from(move |id: String| {
            let state = state.clone();
            let pinned = pinned.clone();
            state.set(PopupState::Busy("Unpinning...".to_string()));

            spawn_local(async move {
                match operations::unpin(&ChromeSyncStore, &RuntimeNotifier, &id).await {
                    Ok(_) => refresh(state, pinned).await,
                    Err(e) => {
                        log::error!("Unpin failed: {}", e);
                        state.set(PopupState::Error(LOAD_ERROR.to_string()));
                    }
                }
            });
        })
    };

    let on_clear_all = {
        let state = state.clone();
        let pinned = pinned.clone();

        Callback::from(move |_| {
            if !confirm("Clear all pinned videos?") {
                return;
            }
            let state = state.clone();
            let pinned = pinned.clone();
            state.set(PopupState::Busy("Clearing...".to_string()));

            spawn_local(async move {
                match operations::clear_all(&ChromeSyncStore, &RuntimeNotifier).await {
                    Ok(()) => refresh(state, pinned).await,
                    Err(e) => {
                        log::error!("Clear all failed: {}", e);
                        state.set(PopupState::Error(LOAD_ERROR.to_string()));
                    }
                }
            });
        })
    };

    let is_busy = !matches!(*state, PopupState::Idle);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"📌 Pinned Videos"}</h1>

            // Status display
            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Busy(msg) => html! {
                    <p class="loading-text">{msg}</p>
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={err.clone()} inline={true}>
                    </Alert>
                },
                PopupState::Idle => html! {}
            }}

            if matches!(*state, PopupState::Idle) && pinned.is_empty() {
                <NoPinsMessage hint={"Pin from any video's page."} />
            } else {
                <div id="list">
                    {for pinned.iter().map(|item| html! {
                        <PinnedVideoCard
                            key={item.id.clone()}
                            item={item.clone()}
                            on_unpin={on_unpin.clone()}
                            disabled={is_busy}
                        />
                    })}
                </div>
            }

            <div class="flex-column-gap">
                <Button
                    onclick={on_clear_all}
                    disabled={is_busy || pinned.is_empty()}
                    variant={ButtonVariant::Danger}
                    block={true}
                >
                    {"Clear all"}
                </Button>
            </div>

            <p class="footer-popup">
                {format!("{} pinned", pinned.len())}
            </p>
        </div>
    }
}

// Helper functions

async fn refresh(state: UseStateHandle<PopupState>, pinned: UseStateHandle<Vec<PinnedItem>>) {
    match ChromeSyncStore.load().await {
        Ok(data) => {
            pinned.set(data.newest_first());
            state.set(PopupState::Idle);
        }
        Err(e) => {
            log::error!("Could not load pinned videos: {}", e);
            state.set(PopupState::Error(LOAD_ERROR.to_string()));
        }
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
