use once_cell::sync::Lazy;
use regex::Regex;
use log::{debug, error, warn};
use url::Url;

use crate::app_config::Config;
use crate::errors::{CaptionError, Stage};
use crate::identifier::VideoIdentifier;
use crate::transport::HttpTransport;

// @module: Watch page retrieval and internal API key extraction

// @const: Quoted key field embedded in the page bootstrap data
static API_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([a-zA-Z0-9_-]+)""#).unwrap()
});

// @const: Marker of the anti-automation challenge page
const CHALLENGE_MARKER: &str = "class=\"g-recaptcha\"";

/// Build the watch page URL for a video
pub fn watch_page_url(config: &Config, video_id: &VideoIdentifier) -> Result<String, CaptionError> {
    let url = Url::parse_with_params(&config.watch_url, &[("v", video_id.as_str())])
        .map_err(|e| CaptionError::UpstreamUnavailable {
            stage: Stage::WatchPage,
            video_id: video_id.to_string(),
            status: None,
            reason: format!("invalid watch URL: {}", e),
        })?;
    Ok(url.into())
}

/// Fetch the watch page HTML with browser-like headers
pub async fn fetch_watch_page(
    transport: &dyn HttpTransport,
    config: &Config,
    video_id: &VideoIdentifier,
) -> Result<String, CaptionError> {
    let url = watch_page_url(config, video_id)?;
    debug!("Fetching watch page for {}", video_id);

    let headers = [
        ("User-Agent", config.user_agent.as_str()),
        ("Accept-Language", config.accept_language.as_str()),
    ];

    let response = transport
        .get(&url, &headers)
        .await
        .map_err(|e| CaptionError::from_transport(Stage::WatchPage, video_id.as_str(), e))?;

    if !response.is_success() {
        error!("Watch page request for {} failed with status {}", video_id, response.status);
        return Err(CaptionError::unavailable_status(Stage::WatchPage, video_id.as_str(), response.status));
    }

    Ok(response.body)
}

/// Extract the internal API key from watch page HTML
///
/// A missing key is reported as `Blocked` when the page is the
/// anti-automation challenge, and as `KeyNotFound` otherwise.
pub fn extract_api_key(html: &str, video_id: &VideoIdentifier) -> Result<String, CaptionError> {
    if let Some(key) = API_KEY_REGEX.captures(html).and_then(|c| c.get(1)) {
        debug!("Found internal API key {} for {}", mask_key(key.as_str()), video_id);
        return Ok(key.as_str().to_string());
    }

    if html.contains(CHALLENGE_MARKER) {
        warn!("Watch page for {} is an anti-automation challenge", video_id);
        return Err(CaptionError::Blocked {
            video_id: video_id.to_string(),
        });
    }

    Err(CaptionError::KeyNotFound {
        video_id: video_id.to_string(),
    })
}

/// Keep only the first characters of a key for log output
pub(crate) fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}…", visible)
}
