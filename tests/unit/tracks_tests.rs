/*!
 * Tests for caption track listing and selection
 */

use serde_json::json;
use ytcaptions::errors::CaptionError;
use ytcaptions::identifier::VideoIdentifier;
use ytcaptions::tracks::{caption_tracks, select_track, TrackSelection};

fn video_id() -> VideoIdentifier {
    VideoIdentifier::from_reference("abc123").unwrap()
}

fn document_with(tracks: serde_json::Value) -> serde_json::Value {
    json!({
        "captions": {
            "playerCaptionsTracklistRenderer": {
                "captionTracks": tracks
            }
        }
    })
}

#[test]
fn test_selectTrack_withEmptyTrackList_shouldFailWithNoCaptions() {
    let document = document_with(json!([]));
    let result = select_track(&document, &TrackSelection::First, &video_id());
    assert!(matches!(result, Err(CaptionError::NoCaptionsAvailable { .. })));
}

#[test]
fn test_selectTrack_withMissingMetadata_shouldFailWithNoCaptions() {
    for document in [json!({}), json!({"captions": {}}), json!({"captions": {"playerCaptionsTracklistRenderer": {}}})] {
        let result = select_track(&document, &TrackSelection::First, &video_id());
        match result {
            Err(CaptionError::NoCaptionsAvailable { video_id }) => assert_eq!(video_id, "abc123"),
            other => panic!("expected NoCaptionsAvailable, got {:?}", other),
        }
    }
}

#[test]
fn test_selectTrack_withFirstPolicy_shouldAlwaysReturnFirstTrack() {
    for count in 1..=5 {
        let tracks: Vec<serde_json::Value> = (0..count)
            .map(|i| json!({ "baseUrl": format!("http://track/{}", i + 1), "languageCode": "en" }))
            .collect();
        let document = document_with(json!(tracks));

        let track = select_track(&document, &TrackSelection::First, &video_id()).unwrap();
        assert_eq!(track.base_url, "http://track/1");
    }
}

#[test]
fn test_selectTrack_withPreferredLanguage_shouldPickMatchingTrack() {
    let document = document_with(json!([
        { "baseUrl": "http://track/en", "languageCode": "en" },
        { "baseUrl": "http://track/fr", "languageCode": "fr-CA" },
    ]));

    let selection = TrackSelection::PreferLanguage("fre".to_string());
    let track = select_track(&document, &selection, &video_id()).unwrap();
    assert_eq!(track.base_url, "http://track/fr");
}

#[test]
fn test_selectTrack_withPreferredLanguageMissing_shouldFallBackToFirst() {
    let document = document_with(json!([
        { "baseUrl": "http://track/en", "languageCode": "en" },
        { "baseUrl": "http://track/fr", "languageCode": "fr" },
    ]));

    let selection = TrackSelection::PreferLanguage("de".to_string());
    let track = select_track(&document, &selection, &video_id()).unwrap();
    assert_eq!(track.base_url, "http://track/en");
}

#[test]
fn test_captionTracks_shouldReadDescriptorFields() {
    let document = document_with(json!([
        {
            "baseUrl": "http://track/1",
            "languageCode": "en",
            "name": { "simpleText": "English (auto-generated)" },
            "kind": "asr"
        },
        {
            "baseUrl": "http://track/2",
            "languageCode": "de",
            "name": { "runs": [ { "text": "Deutsch" } ] }
        },
        { "baseUrl": "http://track/3", "languageCode": "es" },
        { "languageCode": "it" }
    ]));

    let tracks = caption_tracks(&document, &video_id()).unwrap();
    assert_eq!(tracks.len(), 3);

    assert!(tracks[0].is_generated());
    assert_eq!(tracks[0].display_name(), "English (auto-generated)");

    assert!(!tracks[1].is_generated());
    assert_eq!(tracks[1].display_name(), "Deutsch");

    assert_eq!(tracks[2].name, None);
    assert_eq!(tracks[2].display_name(), "Spanish");
}

#[test]
fn test_captionTracks_withOnlyUrllessDescriptors_shouldFailWithNoCaptions() {
    let document = document_with(json!([{ "languageCode": "en" }]));
    assert!(matches!(
        caption_tracks(&document, &video_id()),
        Err(CaptionError::NoCaptionsAvailable { .. })
    ));
}

#[test]
fn test_captionTracks_withBotCheckStatus_shouldFailWithBlocked() {
    let document = json!({
        "playabilityStatus": {
            "status": "LOGIN_REQUIRED",
            "reason": "Sign in to confirm you're not a bot"
        }
    });
    assert!(matches!(
        caption_tracks(&document, &video_id()),
        Err(CaptionError::Blocked { .. })
    ));
}

#[test]
fn test_trackSelection_shouldDeserializeFromConfigShape() {
    let first: TrackSelection = serde_json::from_str(r#""first""#).unwrap();
    assert_eq!(first, TrackSelection::First);

    let preferred: TrackSelection = serde_json::from_str(r#"{"prefer_language":"en"}"#).unwrap();
    assert_eq!(preferred, TrackSelection::PreferLanguage("en".to_string()));
}
