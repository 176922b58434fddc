// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Pinned API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips during the tree walk.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Longest text a single rich-text span may carry.
pub const RICH_TEXT_SPAN_MAX_CHARS: usize = 2000;

/// Spans a single rich-text property accepts in one update.
pub const RICH_TEXT_SPANS_PER_PROPERTY: usize = 100;

// ---------------------------------------------------------------------------
// Pacing and retry
// ---------------------------------------------------------------------------

/// Pause between consecutive mutations (block writes, deletes, property updates).
pub const MUTATION_PAUSE: Duration = Duration::from_millis(350);

/// Extra pause before a write to a field known to be fragile.
pub const FRAGILE_FIELD_PAUSE: Duration = Duration::from_secs(2);

/// Capacity multiplier applied to fragile fields.
pub const FRAGILE_FIELD_SHRINK: f64 = 0.5;

pub const RETRY_MAX_ATTEMPTS: u32 = 4;
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Speech synthesis
// ---------------------------------------------------------------------------

pub const OPENAI_SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";
pub const DEFAULT_TTS_MODEL: &str = "tts-1";
pub const DEFAULT_TTS_VOICE: &str = "alloy";

/// Longest input the speech endpoint accepts per request.
pub const SPEECH_MAX_INPUT_CHARS: usize = 4096;

/// Trailing window searched for a natural boundary before a hard cut.
pub const SPEECH_SPLIT_WINDOW: usize = 500;

/// Pages whose narration text is shorter than this are skipped.
pub const MIN_NARRATION_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Object storage
// ---------------------------------------------------------------------------

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
pub const AUDIO_KEY_PREFIX: &str = "audio";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const TRACKING_SHEET_FILE_NAME: &str = "pages.csv";
pub const MEDIA_SIDECAR_SUFFIX: &str = ".media.json";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
