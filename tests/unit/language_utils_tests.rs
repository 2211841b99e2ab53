/*!
 * Tests for language utility functions
 */

use ytcaptions::language_utils::{get_language_name, language_codes_match, normalize_to_part2t};

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("eng").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");

    // Case and whitespace insensitivity
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("FRE").unwrap(), "fra");
}

#[test]
fn test_normalize_to_part2t_withInvalidCodes_shouldFail() {
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("e").is_err());
    assert!(normalize_to_part2t("123").is_err());
    assert!(normalize_to_part2t("en-US").is_err());
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("eng", "en"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("de", "ger"));
}

#[test]
fn test_language_codes_match_withDifferentOrInvalidCodes_shouldReturnFalse() {
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "xx"));
    assert!(!language_codes_match("", ""));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("xx").is_err());
}
