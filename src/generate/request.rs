//! Inbound request types: [`GenerationRequest`] and the [`Length`] selector.
//!
//! Field names follow the client-facing JSON contract (`camelCase`), and
//! missing fields take the same defaults the client would send.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Candidate themes offered by the picker. Any other text is equally valid.
pub const THEMES: &[&str] = &[
    "Love", "Sad", "Friendship", "Life", "Inspirational", "Nature", "Humor",
    "Patriotic", "Devotional", "Philosophical", "Romantic", "Motivational",
    "Beauty", "Pain", "Hope", "Dreams", "Family", "Children", "Wisdom",
    "Courage", "Destiny", "Time", "Silence", "Rain", "Stars", "Moon", "Sun",
    "Flowers", "Birds", "Rivers", "Mountains", "Sea", "Desert", "Forest",
    "Journey", "Memories", "Separation", "Reunion", "Celebration", "Festival",
    "Morning", "Evening", "Night", "Winter", "Spring", "Summer", "Autumn",
    "Childhood", "Youth", "Old Age", "Death", "Birth", "Marriage", "Friend",
    "Teacher", "Mother", "Father", "Sister", "Brother", "God", "Prayer",
    "Faith", "Truth", "Lie", "Justice", "Injustice", "Peace", "War",
    "Freedom", "Slavery", "Rich", "Poor", "King", "Queen", "Soldier",
    "Farmer", "Doctor", "Engineer", "Artist", "Poet", "Writer", "Musician",
    "Dancer", "Singer", "Actor", "Student", "funny", "education", "sigma",
    "trend",
];

/// Languages offered by the picker. The orchestrator accepts any string.
pub const LANGUAGES: &[&str] = &[
    "English", "Hindi", "Urdu", "Punjabi", "Bengali", "Tamil", "Telugu",
    "Marathi", "Gujarati", "Kannada", "Malayalam", "Odia", "Assamese",
    "Nepali", "Bhojpuri", "Haryanvi", "Rajasthani", "Maithili", "Sindhi",
    "Kashmiri", "Konkani", "Dogri", "Manipuri", "Sanskrit", "Santali",
];

/// Line counts offered by the picker.
pub const LINE_COUNTS: &[u32] = &[2, 4, 6, 8];

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// Qualitative output-size selector.
///
/// Unrecognised values are kept verbatim in [`Length::Other`] and budgeted
/// like [`Length::Medium`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
    Other(String),
}

impl Length {
    /// The selectable variants, in display order.
    pub const CHOICES: [Length; 3] = [Length::Short, Length::Medium, Length::Long];

    /// Parse a selector string. Matching is exact and case-sensitive.
    ///
    /// ```
    /// use shayari_studio::generate::Length;
    ///
    /// assert_eq!(Length::parse("Short"), Length::Short);
    /// assert_eq!(Length::parse("short"), Length::Other("short".into()));
    /// ```
    pub fn parse(value: &str) -> Self {
        match value {
            "Short" => Self::Short,
            "Medium" => Self::Medium,
            "Long" => Self::Long,
            other => Self::Other(other.to_string()),
        }
    }

    /// Maximum output tokens requested from the model for this selector.
    pub fn token_budget(&self) -> u32 {
        match self {
            Self::Short => 512,
            Self::Long => 1536,
            Self::Medium | Self::Other(_) => 1024,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Short => "Short",
            Self::Medium => "Medium",
            Self::Long => "Long",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Length {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        match value {
            Length::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// One generation call's parameters.
///
/// `theme`, `language` and `custom_input` are interpolated into the prompt
/// verbatim; no validation or escaping happens anywhere on the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub custom_input: String,
    /// Approximate target; any integer is accepted.
    #[serde(default = "default_line_count")]
    pub line_count: i64,
    #[serde(default)]
    pub length: Length,
}

fn default_language() -> String {
    "Hindi".into()
}

fn default_line_count() -> i64 {
    4
}

impl GenerationRequest {
    /// A request for `theme` with every other field at its default.
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            language: default_language(),
            custom_input: String::new(),
            line_count: default_line_count(),
            length: Length::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
