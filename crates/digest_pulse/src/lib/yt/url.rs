use std::sync::LazyLock;

use regex::Regex;

static SHORT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?youtu\.be/([A-Za-z0-9_-]{6,})").expect("valid short url regex")
});

static WATCH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/watch\?(?:.*&)?v=([A-Za-z0-9_-]{6,})")
        .expect("valid watch url regex")
});

static PATH_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/(?:shorts|embed|live)/([A-Za-z0-9_-]{6,})")
        .expect("valid path url regex")
});

/// The video id of a YouTube URL in any of its common forms
pub fn video_id(url: &str) -> Option<&str> {
    [&SHORT_URL_RE, &WATCH_URL_RE, &PATH_URL_RE]
        .into_iter()
        .find_map(|re| re.captures(url.trim()))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Another spelling of the same video to try when `url` fails.
///
/// `youtu.be` links become watch URLs and watch URLs become `youtu.be`
/// links; `shorts/`, `embed/` and `live/` links become watch URLs.
pub fn alternate_url(url: &str) -> Option<String> {
    let url = url.trim();
    if let Some(caps) = WATCH_URL_RE.captures(url) {
        return Some(format!("https://youtu.be/{}", &caps[1]));
    }
    [&SHORT_URL_RE, &PATH_URL_RE]
        .into_iter()
        .find_map(|re| re.captures(url))
        .map(|caps| format!("https://www.youtube.com/watch?v={}", &caps[1]))
}
