//! Preference keys, values, groups and the identity persistence is scoped to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reading::{WordByWordDisplay, WordByWordType, WordClickFunctionality};

/// Names a single user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceKey {
    SelectedWordByWordLocale,
    WordByWordDisplay,
    WordByWordContentType,
    WordClickFunctionality,
}

impl PreferenceKey {
    /// Field name in the stored group record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectedWordByWordLocale => "selectedWordByWordLocale",
            Self::WordByWordDisplay => "wordByWordDisplay",
            Self::WordByWordContentType => "wordByWordContentType",
            Self::WordClickFunctionality => "wordClickFunctionality",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a single preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Locale(String),
    ClickFunctionality(WordClickFunctionality),
    DisplayModes(Vec<WordByWordDisplay>),
    ContentTypes(Vec<WordByWordType>),
}

impl From<String> for PreferenceValue {
    fn from(value: String) -> Self {
        Self::Locale(value)
    }
}

impl From<WordClickFunctionality> for PreferenceValue {
    fn from(value: WordClickFunctionality) -> Self {
        Self::ClickFunctionality(value)
    }
}

impl From<Vec<WordByWordDisplay>> for PreferenceValue {
    fn from(value: Vec<WordByWordDisplay>) -> Self {
        Self::DisplayModes(value)
    }
}

impl From<Vec<WordByWordType>> for PreferenceValue {
    fn from(value: Vec<WordByWordType>) -> Self {
        Self::ContentTypes(value)
    }
}

/// Backend collection a preference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceGroup {
    Language,
    Reading,
    QuranReaderStyles,
    Translations,
    Tafsirs,
    Audio,
}

impl PreferenceGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Reading => "reading",
            Self::QuranReaderStyles => "quranReaderStyles",
            Self::Translations => "translations",
            Self::Tafsirs => "tafsirs",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for PreferenceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated { user_id: String, token: String },
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Key for client-side state of this identity.
    pub fn storage_key(&self) -> &str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticated { user_id, .. } => user_id.as_str(),
        }
    }
}
