/// Element ids, host page selectors and timings used by the page scripts
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnerConfig {
    pub row_id: String,
    pub watch_button_id: String,
    pub feed_button_class: String,
    pub message_id: String,

    /// Where the pinned row goes, first match wins
    pub row_anchors: Vec<String>,
    /// Action bar containers on the watch page, first match wins
    pub action_containers: Vec<String>,
    pub feed_items: Vec<String>,
    /// Feed item containers that carry the overlay, closest wins
    pub feed_containers: Vec<String>,
    pub feed_item_title: String,
    pub feed_item_link: String,
    /// Added nodes that signal the watch page is (re)building
    pub watch_markers: Vec<String>,
    /// Added nodes that signal the feed is (re)building
    pub feed_markers: Vec<String>,

    pub mutation_debounce_ms: u32,
    pub url_poll_ms: u32,
    pub scroll_debounce_ms: u32,
    pub initial_home_delay_ms: u32,
    pub navigation_home_delay_ms: u32,
    pub change_render_delay_ms: u32,
    pub message_duration_ms: u32,

    pub watch_button_retry: RetryPolicy,
    pub feed_decoration_retry: RetryPolicy,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PinnerConfig {
    fn default() -> Self {
        PinnerConfig {
            row_id: "yt-pinned-row".to_string(),
            watch_button_id: "ytp-pin-button".to_string(),
            feed_button_class: "ytp-homepage-pin-btn".to_string(),
            message_id: "ytp-pin-msg".to_string(),

            row_anchors: strings(&[
                "ytd-browse[page-subtype='home'] #contents ytd-rich-grid-renderer",
                "ytd-two-column-browse-results-renderer #contents",
                "#contents ytd-rich-grid-renderer",
                "ytd-rich-grid-renderer",
            ]),
            action_containers: strings(&[
                "ytd-watch-metadata #actions #top-level-buttons-computed",
                "#actions ytd-menu-renderer #top-level-buttons-computed",
                "#top-level-buttons-computed",
                "ytd-menu-renderer #top-level-buttons-computed",
                "#actions #menu-container #top-level-buttons-computed",
                "ytd-watch-metadata #menu-container",
                "#menu-container #top-level-buttons-computed",
                "#actions",
                "ytd-menu-renderer",
                "#owner",
            ]),
            feed_items: strings(&[
                "ytd-video-renderer",
                "ytd-rich-item-renderer",
                "ytd-compact-video-renderer",
                "ytd-grid-video-renderer",
            ]),
            feed_containers: strings(&[
                "ytd-video-renderer",
                "ytd-rich-item-renderer",
                "ytd-compact-video-renderer",
            ]),
            feed_item_title: "#video-title, h3, [id*=\"title\"]".to_string(),
            feed_item_link: "a[href*=\"/watch?v=\"]".to_string(),
            watch_markers: strings(&[
                "ytd-watch-metadata",
                "#actions",
                "ytd-menu-renderer",
                "#top-level-buttons-computed",
                "ytd-video-primary-info-renderer",
            ]),
            feed_markers: strings(&[
                "ytd-rich-grid-renderer",
                "ytd-browse",
                "ytd-video-renderer",
                "ytd-rich-item-renderer",
                "ytd-compact-video-renderer",
                "ytd-grid-video-renderer",
            ]),

            mutation_debounce_ms: 200,
            url_poll_ms: 1000,
            scroll_debounce_ms: 500,
            initial_home_delay_ms: 1500,
            navigation_home_delay_ms: 1000,
            change_render_delay_ms: 500,
            message_duration_ms: 1600,

            watch_button_retry: RetryPolicy {
                ladder_ms: vec![200, 500, 800, 1200, 1500, 2000, 2500, 3000, 4000, 5000],
                interval_ms: 1000,
                max_attempts: 100,
                timeout_ms: 120_000,
            },
            feed_decoration_retry: RetryPolicy::interval(1000, 30),
        }
    }
}

impl PinnerConfig {
    /// Selector list joined for `querySelector`/`matches`
    pub fn selector_group(selectors: &[String]) -> String {
        selectors.join(", ")
    }

    pub fn feed_item_selector(&self) -> String {
        Self::selector_group(&self.feed_items)
    }

    /// Every marker whose arrival should re-run the page setup
    pub fn mutation_markers(&self) -> String {
        let all: Vec<String> = self
            .watch_markers
            .iter()
            .chain(self.feed_markers.iter())
            .cloned()
            .collect();
        Self::selector_group(&all)
    }

    pub fn feed_container_selector(&self) -> String {
        Self::selector_group(&self.feed_containers)
    }

    pub fn feed_button_selector(&self) -> String {
        format!(".{}", self.feed_button_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids() {
        let config = PinnerConfig::default();

        assert_eq!(config.watch_button_id, "ytp-pin-button");
        assert_eq!(config.feed_button_selector(), ".ytp-homepage-pin-btn");
        assert_eq!(config.row_id, "yt-pinned-row");
    }

    #[test]
    fn test_overlay_containers_are_feed_items() {
        let config = PinnerConfig::default();

        assert_eq!(
            config.feed_container_selector(),
            "ytd-video-renderer, ytd-rich-item-renderer, ytd-compact-video-renderer"
        );
        assert!(config.feed_containers.iter().all(|c| config.feed_items.contains(c)));
    }

    #[test]
    fn test_debounce_within_expected_window() {
        let config = PinnerConfig::default();
        assert!((200..=500).contains(&config.mutation_debounce_ms));
    }

    #[test]
    fn test_watch_button_retry_is_bounded() {
        let policy = PinnerConfig::default().watch_button_retry;
        let offsets = policy.offsets();

        assert_eq!(offsets.len(), 100);
        assert_eq!(&offsets[..4], &[0, 200, 500, 800]);
        assert!(offsets.iter().all(|&o| o <= 120_000));
    }

    #[test]
    fn test_feed_decoration_retry() {
        let offsets = PinnerConfig::default().feed_decoration_retry.offsets();

        assert_eq!(offsets.len(), 30);
        assert_eq!(offsets[29], 29_000);
    }

    #[test]
    fn test_mutation_markers_cover_both_page_kinds() {
        let markers = PinnerConfig::default().mutation_markers();

        assert!(markers.starts_with("ytd-watch-metadata, #actions"));
        assert!(markers.ends_with("ytd-grid-video-renderer"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PinnerConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: PinnerConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }
}
