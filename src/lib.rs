/*!
 * # ytcaptions - timed captions for hosted videos
 *
 * A Rust library retrieving machine-generated or uploader-supplied
 * captions for a video, using the platform's undocumented web contracts.
 *
 * ## Features
 *
 * - Resolve a video identifier from watch URLs, short links, embed URLs
 *   or bare identifiers
 * - Scrape the internal API key from the watch page, telling a markup
 *   change apart from an anti-automation challenge
 * - Query the internal player API for the caption tracks
 * - Pick a track by an overridable policy (first, or preferred language)
 * - Parse both observed caption XML schemas into one timed model
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `identifier`: Video identifier resolution
 * - `watch_page`: Watch page retrieval and API key extraction
 * - `innertube`: Internal player API client
 * - `tracks`: Caption track listing and selection
 * - `caption_fetch`: Caption payload retrieval
 * - `captions`: Caption data model and XML parsing
 * - `caption_client`: Pipeline facade
 * - `transport`: HTTP transport trait and reqwest implementation
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `logging`: Optional stderr logger
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod caption_client;
pub mod caption_fetch;
pub mod captions;
pub mod errors;
pub mod identifier;
pub mod innertube;
pub mod language_utils;
pub mod logging;
pub mod tracks;
pub mod transport;
pub mod watch_page;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_client::CaptionClient;
pub use captions::{CaptionDocument, CaptionEntry, CaptionPart, CaptionSchema, parse_caption_xml};
pub use errors::{CaptionError, CaptionXmlError, Stage, TransportError};
pub use identifier::VideoIdentifier;
pub use tracks::{CaptionTrack, TrackSelection};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
