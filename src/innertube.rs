use serde::Serialize;
use log::{debug, error};
use url::Url;

use crate::app_config::{ClientContext, Config};
use crate::errors::{CaptionError, Stage};
use crate::identifier::VideoIdentifier;
use crate::transport::HttpTransport;
use crate::watch_page::mask_key;

/// Player API request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest<'a> {
    /// Client metadata
    context: RequestContext<'a>,
    /// Video to describe
    video_id: &'a str,
}

/// Wrapper object the API expects around the client metadata
#[derive(Debug, Serialize)]
struct RequestContext<'a> {
    client: &'a ClientContext,
}

impl<'a> PlayerRequest<'a> {
    /// Create a new player request
    pub fn new(client: &'a ClientContext, video_id: &'a VideoIdentifier) -> Self {
        Self {
            context: RequestContext { client },
            video_id: video_id.as_str(),
        }
    }
}

/// Build the player API URL carrying the key as a query credential
pub fn player_api_url(config: &Config, api_key: &str, video_id: &VideoIdentifier) -> Result<String, CaptionError> {
    let url = Url::parse_with_params(&config.player_api_url, &[("key", api_key)])
        .map_err(|e| CaptionError::UpstreamUnavailable {
            stage: Stage::InnerApi,
            video_id: video_id.to_string(),
            status: None,
            reason: format!("invalid player API URL: {}", e),
        })?;
    Ok(url.into())
}

/// Call the player API and return its JSON document unmodified
pub async fn fetch_player_response(
    transport: &dyn HttpTransport,
    config: &Config,
    video_id: &VideoIdentifier,
    api_key: &str,
) -> Result<serde_json::Value, CaptionError> {
    let url = player_api_url(config, api_key, video_id)?;
    let body = serde_json::to_value(PlayerRequest::new(&config.client, video_id))
        .map_err(|e| CaptionError::malformed(Stage::InnerApi, video_id.as_str(), e.to_string()))?;

    debug!(
        "Calling player API for {} with key {} as {} {}",
        video_id,
        mask_key(api_key),
        config.client.client_name,
        config.client.client_version
    );

    let headers = [
        ("Content-Type", "application/json"),
        ("User-Agent", config.user_agent.as_str()),
    ];

    let response = transport
        .post_json(&url, &headers, &body)
        .await
        .map_err(|e| CaptionError::from_transport(Stage::InnerApi, video_id.as_str(), e))?;

    if !response.is_success() {
        error!("Player API error for {} ({})", video_id, response.status);
        return Err(CaptionError::unavailable_status(Stage::InnerApi, video_id.as_str(), response.status));
    }

    serde_json::from_str(&response.body).map_err(|e| {
        CaptionError::malformed(Stage::InnerApi, video_id.as_str(), format!("invalid JSON: {}", e))
    })
}
