/*!
 * Tests for error types and their diagnostic context
 */

use ytcaptions::errors::{CaptionError, CaptionXmlError, Stage, TransportError};

#[test]
fn test_captionError_invalidReference_shouldDisplayReference() {
    let error = CaptionError::InvalidReference {
        reference: "https://example.com/x".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Invalid video reference"));
    assert!(display.contains("https://example.com/x"));
    assert_eq!(error.video_id(), None);
    assert_eq!(error.stage(), None);
}

#[test]
fn test_captionError_upstreamUnavailable_shouldDisplayStageAndVideo() {
    let error = CaptionError::UpstreamUnavailable {
        stage: Stage::CaptionTrack,
        video_id: "abc123".to_string(),
        status: Some(500),
        reason: "HTTP status 500".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("caption track"));
    assert!(display.contains("abc123"));
    assert!(display.contains("500"));
    assert!(error.is_retryable());
}

#[test]
fn test_captionError_blockedAndKeyNotFound_shouldBeTreatedDifferently() {
    let blocked = CaptionError::Blocked { video_id: "abc123".to_string() };
    let missing = CaptionError::KeyNotFound { video_id: "abc123".to_string() };

    assert!(blocked.needs_backoff());
    assert!(!missing.needs_backoff());
    assert!(!blocked.is_retryable());
    assert!(!missing.is_retryable());
    assert!(format!("{}", blocked).contains("anti-automation"));
    assert!(format!("{}", missing).contains("key not found"));
    assert_eq!(blocked.stage(), Some(Stage::WatchPage));
    assert_eq!(missing.video_id(), Some("abc123"));
}

#[test]
fn test_captionError_malformedResponse_shouldCarryStage() {
    let error = CaptionError::MalformedResponse {
        stage: Stage::CaptionParse,
        video_id: "abc123".to_string(),
        message: "unexpected end".to_string(),
    };
    assert_eq!(error.stage(), Some(Stage::CaptionParse));
    assert!(format!("{}", error).contains("caption payload"));
    assert!(!error.is_retryable());
}

#[test]
fn test_captionError_noCaptionsAvailable_shouldBeTerminal() {
    let error = CaptionError::NoCaptionsAvailable { video_id: "abc123".to_string() };
    assert!(!error.is_retryable());
    assert!(!error.needs_backoff());
    assert!(format!("{}", error).contains("No caption tracks"));
}

#[test]
fn test_transportError_shouldDisplayCorrectly() {
    let error = TransportError::ConnectionError("Host unreachable".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Connection error"));
    assert!(display.contains("Host unreachable"));
}

#[test]
fn test_captionXmlError_shouldDisplayMessage() {
    let error = CaptionXmlError::new("ill-formed document");
    assert!(format!("{}", error).contains("ill-formed document"));
}
