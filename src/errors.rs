/*!
 * Error types for the ytcaptions library.
 *
 * This module contains the error taxonomy of the caption pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;
use thiserror::Error;

/// Pipeline stage in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching the watch page HTML
    WatchPage,
    /// Calling the internal player API
    InnerApi,
    /// Fetching the caption track payload
    CaptionTrack,
    /// Parsing the caption payload
    CaptionParse,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WatchPage => "watch page",
            Self::InnerApi => "player API",
            Self::CaptionTrack => "caption track",
            Self::CaptionParse => "caption payload",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by the HTTP transport itself
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be built or sent
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    BodyError(String),
}

/// Structural failure while reading a caption XML payload
#[derive(Error, Debug)]
#[error("Malformed caption XML: {message}")]
pub struct CaptionXmlError {
    pub message: String,
}

impl CaptionXmlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Errors that can occur while retrieving captions for a video
#[derive(Error, Debug)]
pub enum CaptionError {
    /// No video identifier could be derived from the reference
    #[error("Invalid video reference: {reference:?}")]
    InvalidReference {
        /// The reference as supplied by the caller
        reference: String,
    },

    /// Non-success HTTP status, or the transport failed, at a network stage
    #[error("{stage} unavailable for video {video_id}: {reason}")]
    UpstreamUnavailable {
        stage: Stage,
        video_id: String,
        /// HTTP status code, if a response was received
        status: Option<u16>,
        reason: String,
    },

    /// The platform answered with an anti-automation challenge
    #[error("Request for video {video_id} was blocked by an anti-automation challenge")]
    Blocked { video_id: String },

    /// The watch page no longer carries the key where we look for it
    #[error("Internal API key not found in watch page for video {video_id}")]
    KeyNotFound { video_id: String },

    /// A JSON or XML payload was structurally invalid
    #[error("Malformed {stage} response for video {video_id}: {message}")]
    MalformedResponse {
        stage: Stage,
        video_id: String,
        message: String,
    },

    /// The video has no caption tracks
    #[error("No caption tracks available for video {video_id}")]
    NoCaptionsAvailable { video_id: String },
}

impl CaptionError {
    pub(crate) fn unavailable_status(stage: Stage, video_id: &str, status: u16) -> Self {
        Self::UpstreamUnavailable {
            stage,
            video_id: video_id.to_string(),
            status: Some(status),
            reason: format!("HTTP status {}", status),
        }
    }

    pub(crate) fn from_transport(stage: Stage, video_id: &str, error: TransportError) -> Self {
        Self::UpstreamUnavailable {
            stage,
            video_id: video_id.to_string(),
            status: None,
            reason: error.to_string(),
        }
    }

    pub(crate) fn malformed(stage: Stage, video_id: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            stage,
            video_id: video_id.to_string(),
            message: message.into(),
        }
    }

    /// Whether re-running the pipeline after a short backoff may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// Whether the caller should back off significantly before trying again
    pub fn needs_backoff(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// The stage the failure belongs to, when it is tied to one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::UpstreamUnavailable { stage, .. } | Self::MalformedResponse { stage, .. } => {
                Some(*stage)
            }
            Self::Blocked { .. } | Self::KeyNotFound { .. } => Some(Stage::WatchPage),
            Self::NoCaptionsAvailable { .. } => Some(Stage::InnerApi),
            Self::InvalidReference { .. } => None,
        }
    }

    /// The video identifier the failure refers to
    pub fn video_id(&self) -> Option<&str> {
        match self {
            Self::InvalidReference { .. } => None,
            Self::UpstreamUnavailable { video_id, .. }
            | Self::Blocked { video_id }
            | Self::KeyNotFound { video_id }
            | Self::MalformedResponse { video_id, .. }
            | Self::NoCaptionsAvailable { video_id } => Some(video_id),
        }
    }
}
