/*!
 * Caption pipeline facade.
 *
 * `CaptionClient` runs the stages in order:
 * reference -> identifier -> watch page -> API key -> player document
 * -> caption track -> caption XML -> `CaptionDocument`.
 *
 * Every call starts from a fresh watch page; keys and track URLs are
 * never kept between calls. The first failing stage aborts the call.
 */

use std::sync::Arc;
use log::{debug, info};

use crate::app_config::Config;
use crate::caption_fetch::fetch_caption_xml;
use crate::captions::{parse_caption_xml, CaptionDocument};
use crate::errors::{CaptionError, Stage, TransportError};
use crate::identifier::VideoIdentifier;
use crate::innertube::fetch_player_response;
use crate::tracks::{caption_tracks, select_track, CaptionTrack, TrackSelection};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::watch_page::{extract_api_key, fetch_watch_page};

/// Client retrieving timed captions for videos
#[derive(Debug, Clone)]
pub struct CaptionClient {
    /// Request constants and selection policy
    config: Config,
    /// Shared HTTP transport
    transport: Arc<dyn HttpTransport>,
}

impl CaptionClient {
    /// Create a client backed by a reqwest transport
    pub fn new(config: Config) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of any transport
    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch and parse captions using the configured track selection
    pub async fn fetch_captions(&self, reference: &str) -> Result<CaptionDocument, CaptionError> {
        self.fetch_captions_with(reference, &self.config.track_selection).await
    }

    /// Fetch and parse captions using the given track selection
    pub async fn fetch_captions_with(
        &self,
        reference: &str,
        selection: &TrackSelection,
    ) -> Result<CaptionDocument, CaptionError> {
        let video_id = VideoIdentifier::from_reference(reference)?;
        let document = self.player_document(&video_id).await?;
        let track = select_track(&document, selection, &video_id)?;
        debug!(
            "Selected caption track '{}' ({}) for {}",
            track.display_name(),
            if track.is_generated() { "generated" } else { "authored" },
            video_id
        );
        self.fetch_track(&video_id, &track).await
    }

    /// List every caption track of a video without fetching any of them
    pub async fn list_tracks(&self, reference: &str) -> Result<Vec<CaptionTrack>, CaptionError> {
        let video_id = VideoIdentifier::from_reference(reference)?;
        let document = self.player_document(&video_id).await?;
        caption_tracks(&document, &video_id)
    }

    /// Fetch and parse one track, e.g. one returned by `list_tracks`
    pub async fn fetch_track(
        &self,
        video_id: &VideoIdentifier,
        track: &CaptionTrack,
    ) -> Result<CaptionDocument, CaptionError> {
        let xml = fetch_caption_xml(self.transport.as_ref(), &self.config, track, video_id).await?;

        let document = parse_caption_xml(&xml)
            .map_err(|e| CaptionError::malformed(Stage::CaptionParse, video_id.as_str(), e.message))?;

        info!(
            "Parsed {} caption entries for {}",
            document.len(),
            video_id
        );
        Ok(document)
    }

    async fn player_document(&self, video_id: &VideoIdentifier) -> Result<serde_json::Value, CaptionError> {
        let html = fetch_watch_page(self.transport.as_ref(), &self.config, video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        fetch_player_response(self.transport.as_ref(), &self.config, video_id, &api_key).await
    }
}
