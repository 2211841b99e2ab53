use log::{debug, error};

use crate::app_config::Config;
use crate::errors::{CaptionError, Stage};
use crate::identifier::VideoIdentifier;
use crate::tracks::CaptionTrack;
use crate::transport::HttpTransport;

/// Fetch the raw caption payload of a track
///
/// The track URL is used as-is. An empty body is an upstream anomaly,
/// not an empty caption list, and fails like a non-success status.
pub async fn fetch_caption_xml(
    transport: &dyn HttpTransport,
    config: &Config,
    track: &CaptionTrack,
    video_id: &VideoIdentifier,
) -> Result<String, CaptionError> {
    debug!(
        "Fetching caption track '{}' for {}",
        track.language_code.as_deref().unwrap_or("?"),
        video_id
    );

    let headers = [("User-Agent", config.user_agent.as_str())];

    let response = transport
        .get(&track.base_url, &headers)
        .await
        .map_err(|e| CaptionError::from_transport(Stage::CaptionTrack, video_id.as_str(), e))?;

    if !response.is_success() {
        error!("Caption track request for {} failed with status {}", video_id, response.status);
        return Err(CaptionError::unavailable_status(Stage::CaptionTrack, video_id.as_str(), response.status));
    }

    if response.body.trim().is_empty() {
        error!("Caption track for {} returned an empty body", video_id);
        return Err(CaptionError::UpstreamUnavailable {
            stage: Stage::CaptionTrack,
            video_id: video_id.to_string(),
            status: Some(response.status),
            reason: "empty caption payload".to_string(),
        });
    }

    Ok(response.body)
}
