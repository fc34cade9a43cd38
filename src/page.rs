/// Page classification and metadata extraction for the host site
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const SITE_ORIGIN: &str = "https://www.youtube.com";

static NOTIFICATION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d+\+?\)\s*").unwrap());
static SITE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*YouTube\s*$").unwrap());

/// Which kind of page the content script is running on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Watch { video_id: String },
    Other,
}

impl PageKind {
    /// Classify a full location href
    ///
    /// - `https://www.youtube.com/` → Home
    /// - `https://www.youtube.com/watch?v=ID` → Watch
    /// - anything else (search, channels, shorts, unparsable) → Other
    pub fn from_url(href: &str) -> PageKind {
        let Ok(url) = Url::parse(href) else {
            return PageKind::Other;
        };

        if let Some(video_id) = query_video_id(&url) {
            return PageKind::Watch { video_id };
        }

        if url.path() == "/" {
            PageKind::Home
        } else {
            PageKind::Other
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, PageKind::Home)
    }

    pub fn video_id(&self) -> Option<&str> {
        match self {
            PageKind::Watch { video_id } => Some(video_id),
            _ => None,
        }
    }
}

/// Video id from a link href, which may be relative (`/watch?v=...`) as the
/// feed renders it
pub fn video_id_from_href(href: &str) -> Option<String> {
    let base = Url::parse(SITE_ORIGIN).ok()?;
    let url = base.join(href).ok()?;
    if url.path() != "/watch" {
        return None;
    }
    query_video_id(&url)
}

fn query_video_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Video title from the document title: strips the unread-notification count
/// and the site suffix ("(3) My Video - YouTube" → "My Video")
pub fn clean_document_title(title: &str) -> String {
    let without_prefix = NOTIFICATION_PREFIX.replace(title.trim(), "");
    SITE_SUFFIX.replace(&without_prefix, "").trim().to_string()
}
