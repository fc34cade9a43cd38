/// Reusable popup components

use crate::pinned::PinnedItem;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PinnedVideoCardProps {
    pub item: PinnedItem,
    pub on_unpin: Callback<String>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(PinnedVideoCard)]
pub fn pinned_video_card(props: &PinnedVideoCardProps) -> Html {
    let item = &props.item;

    let on_unpin = props.on_unpin.reform({
        let id = item.id.clone();
        move |_: MouseEvent| id.clone()
    });

    html! {
        <div class="item">
            <img src={item.thumbnail.clone()} alt={item.title.clone()} />
            <div class="meta">
                <div class="title">{&item.title}</div>
                <a href={item.watch_url()} target="_blank">{"Open"}</a>
            </div>
            <Button
                onclick={on_unpin}
                disabled={props.disabled}
                variant={ButtonVariant::Plain}
            >
                {"❌"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoPinsMessageProps {
    #[prop_or_default]
    pub hint: Option<String>,
}

#[function_component(NoPinsMessage)]
pub fn no_pins_message(props: &NoPinsMessageProps) -> Html {
    html! {
        <div class="empty-state">
            <p>{"No pinned videos yet."}</p>
            if let Some(hint) = &props.hint {
                <p class="empty-state-hint">{hint}</p>
            }
        </div>
    }
}
