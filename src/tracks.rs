/*!
 * Caption track discovery and selection.
 *
 * The player API document lists the available caption tracks under
 * `captions.playerCaptionsTracklistRenderer.captionTracks`. Each track
 * descriptor carries at least a `baseUrl`; the language code, display
 * name and kind are read when present.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{debug, warn};

use crate::errors::CaptionError;
use crate::identifier::VideoIdentifier;
use crate::language_utils;

/// One caption stream offered for a video
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// Playback URL of the caption payload
    pub base_url: String,
    /// Declared language code (e.g. "en", "pt-BR")
    pub language_code: Option<String>,
    /// Human-readable track name
    pub name: Option<String>,
    /// Track kind; "asr" marks machine-generated captions
    pub kind: Option<String>,
}

impl CaptionTrack {
    /// Whether the track was produced by speech recognition
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// Track name, or the English name of its language when the track has none
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.language_code
            .as_deref()
            .map(|code| {
                let primary = code.split(['-', '_']).next().unwrap_or(code);
                language_utils::get_language_name(primary).unwrap_or_else(|_| code.to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn from_json(descriptor: &Value) -> Option<Self> {
        let base_url = descriptor.get("baseUrl")?.as_str()?.to_string();

        let language_code = descriptor
            .get("languageCode")
            .and_then(Value::as_str)
            .map(str::to_string);

        // Names come either as simpleText or as a list of runs
        let name = descriptor.get("name").and_then(|name| {
            name.get("simpleText")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| {
                    name.get("runs")
                        .and_then(Value::as_array)
                        .map(|runs| {
                            runs.iter()
                                .filter_map(|run| run.get("text").and_then(Value::as_str))
                                .collect::<String>()
                        })
                })
        });

        let kind = descriptor
            .get("kind")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            base_url,
            language_code,
            name,
            kind,
        })
    }
}

/// Policy deciding which caption track to fetch
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackSelection {
    /// The first track in list order
    #[default]
    First,
    /// The first track declaring the given language, else the first track
    PreferLanguage(String),
}

impl TrackSelection {
    /// Pick a track from a non-empty list
    pub fn pick<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        match self {
            Self::First => tracks.first(),
            Self::PreferLanguage(tag) => tracks
                .iter()
                .find(|track| {
                    track
                        .language_code
                        .as_deref()
                        .is_some_and(|code| language_tags_match(code, tag))
                })
                .or_else(|| {
                    debug!("No caption track in language '{}', falling back to the first one", tag);
                    tracks.first()
                }),
        }
    }
}

/// Compare two language tags on their primary subtag ("en-US" matches "eng")
fn language_tags_match(declared: &str, wanted: &str) -> bool {
    if declared.eq_ignore_ascii_case(wanted) {
        return true;
    }
    let primary = |tag: &str| tag.split(['-', '_']).next().unwrap_or(tag).to_string();
    language_utils::language_codes_match(&primary(declared), &primary(wanted))
}

/// List every caption track in a player API document
///
/// Fails with `NoCaptionsAvailable` when the caption metadata is absent
/// or lists no usable track, and with `Blocked` when the document says
/// the request was stopped by a bot check.
pub fn caption_tracks(document: &Value, video_id: &VideoIdentifier) -> Result<Vec<CaptionTrack>, CaptionError> {
    let descriptors = document
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(Value::as_array);

    let tracks: Vec<CaptionTrack> = descriptors
        .map(|list| list.iter().filter_map(CaptionTrack::from_json).collect())
        .unwrap_or_default();

    if tracks.is_empty() {
        if is_bot_check(document) {
            warn!("Player API reported a bot check for {}", video_id);
            return Err(CaptionError::Blocked {
                video_id: video_id.to_string(),
            });
        }
        return Err(CaptionError::NoCaptionsAvailable {
            video_id: video_id.to_string(),
        });
    }

    debug!("Found {} caption track(s) for {}", tracks.len(), video_id);
    Ok(tracks)
}

/// Select one caption track according to the policy
pub fn select_track(
    document: &Value,
    selection: &TrackSelection,
    video_id: &VideoIdentifier,
) -> Result<CaptionTrack, CaptionError> {
    let tracks = caption_tracks(document, video_id)?;
    selection
        .pick(&tracks)
        .cloned()
        .ok_or_else(|| CaptionError::NoCaptionsAvailable {
            video_id: video_id.to_string(),
        })
}

fn is_bot_check(document: &Value) -> bool {
    let Some(status) = document.get("playabilityStatus") else {
        return false;
    };
    let state = status.get("status").and_then(Value::as_str).unwrap_or("");
    let reason = status.get("reason").and_then(Value::as_str).unwrap_or("");
    state == "LOGIN_REQUIRED" && reason.contains("not a bot")
}
