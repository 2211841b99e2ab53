/*!
 * Tests for video identifier resolution
 */

use ytcaptions::errors::CaptionError;
use ytcaptions::identifier::VideoIdentifier;

fn resolve(reference: &str) -> String {
    VideoIdentifier::from_reference(reference)
        .unwrap_or_else(|e| panic!("{} should resolve: {}", reference, e))
        .to_string()
}

#[test]
fn test_fromReference_withKnownShapes_shouldYieldSameIdentifier() {
    let references = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "dQw4w9WgXcQ",
    ];

    for reference in references {
        assert_eq!(resolve(reference), "dQw4w9WgXcQ", "reference: {}", reference);
    }
}

#[test]
fn test_fromReference_withExtraQueryParameters_shouldCaptureOnlyId() {
    assert_eq!(resolve("https://www.youtube.com/watch?v=abc123&t=42s"), "abc123");
    assert_eq!(resolve("https://m.youtube.com/watch?feature=share&v=abc123"), "abc123");
    assert_eq!(resolve("youtu.be/abc123?si=tracking"), "abc123");
    assert_eq!(resolve("http://youtube.com/embed/abc123?autoplay=1"), "abc123");
}

#[test]
fn test_fromReference_withRepeatedVideoParameter_shouldTakeFirst() {
    assert_eq!(resolve("https://www.youtube.com/watch?v=abc&list=x&v=def"), "abc");
    assert_eq!(resolve("https://www.youtube.com/watch?feature=share&v=abc&v=def"), "abc");
}

#[test]
fn test_fromReference_withSurroundingWhitespace_shouldTrim() {
    assert_eq!(resolve("  abc123\n"), "abc123");
}

#[test]
fn test_fromReference_withUnrecognizedPath_shouldFailWithInvalidReference() {
    let result = VideoIdentifier::from_reference("https://example.com/videos/abc123");
    match result {
        Err(CaptionError::InvalidReference { reference }) => {
            assert_eq!(reference, "https://example.com/videos/abc123");
        }
        other => panic!("expected InvalidReference, got {:?}", other),
    }
}

#[test]
fn test_fromReference_withDomainButNoPattern_shouldFail() {
    assert!(matches!(
        VideoIdentifier::from_reference("youtube.com"),
        Err(CaptionError::InvalidReference { .. })
    ));
    assert!(matches!(
        VideoIdentifier::from_reference("https://www.youtube.com/channel/UC123"),
        Err(CaptionError::InvalidReference { .. })
    ));
}

#[test]
fn test_fromReference_withEmptyInput_shouldFail() {
    assert!(VideoIdentifier::from_reference("").is_err());
    assert!(VideoIdentifier::from_reference("   ").is_err());
}

#[test]
fn test_fromStr_shouldMatchFromReference() {
    let id: VideoIdentifier = "https://youtu.be/abc123".parse().unwrap();
    assert_eq!(id.as_str(), "abc123");
}
