/**
 * Reading Types
 *
 * Word-by-word reading preferences and the enums they are built from.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locales with word-by-word translations, in catalog order.
pub const WBW_LOCALES: [&str; 11] = [
    "en", "ur", "id", "bn", "tr", "fa", "ru", "hi", "de", "ta", "inh",
];

/// Fallback word-by-word locale.
pub const DEFAULT_WBW_LOCALE: &str = "en";

/// Check whether a code is a supported word-by-word locale.
pub fn is_supported_wbw_locale(code: &str) -> bool {
    WBW_LOCALES.contains(&code)
}

/// Default word-by-word locale for a UI language.
///
/// The UI language itself when it has word-by-word data, otherwise English.
pub fn default_wbw_locale_for(ui_language: &str) -> &'static str {
    WBW_LOCALES
        .iter()
        .find(|code| **code == ui_language)
        .copied()
        .unwrap_or(DEFAULT_WBW_LOCALE)
}

/// Native display name of a locale.
pub fn locale_name(code: &str) -> &'static str {
    match code {
        "en" => "English",
        "ur" => "اردو",
        "id" => "Indonesia",
        "bn" => "বাংলা",
        "tr" => "Türkçe",
        "fa" => "فارسی",
        "ru" => "Русский",
        "hi" => "हिन्दी",
        "de" => "Deutsch",
        "ta" => "தமிழ்",
        "inh" => "ГӀалгӀай",
        _ => "Unknown",
    }
}

/// What clicking a word does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordClickFunctionality {
    PlayAudio,
    NoAudio,
}

impl WordClickFunctionality {
    pub fn from_enabled(play_audio: bool) -> Self {
        if play_audio {
            Self::PlayAudio
        } else {
            Self::NoAudio
        }
    }

    /// The other variant.
    pub fn swapped(self) -> Self {
        match self {
            Self::PlayAudio => Self::NoAudio,
            Self::NoAudio => Self::PlayAudio,
        }
    }
}

impl fmt::Display for WordClickFunctionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayAudio => write!(f, "play-audio"),
            Self::NoAudio => write!(f, "no-audio"),
        }
    }
}

/// Where word-by-word content is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordByWordDisplay {
    Inline,
    Tooltip,
}

impl fmt::Display for WordByWordDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => write!(f, "inline"),
            Self::Tooltip => write!(f, "tooltip"),
        }
    }
}

/// Which word-by-word content is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordByWordType {
    Translation,
    Transliteration,
}

impl fmt::Display for WordByWordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translation => write!(f, "translation"),
            Self::Transliteration => write!(f, "transliteration"),
        }
    }
}

/// Next value of an ordered tag set after a toggle.
///
/// Enabling appends the tag when absent; disabling removes it. The result
/// never holds duplicates as long as the input did not.
pub fn toggle_tag<T: Copy + PartialEq>(current: &[T], tag: T, enabled: bool) -> Vec<T> {
    let mut next = current.to_vec();
    if enabled {
        if !next.contains(&tag) {
            next.push(tag);
        }
    } else if let Some(index) = next.iter().position(|t| *t == tag) {
        next.remove(index);
    }
    next
}

fn dedup_tags<T: Copy + PartialEq>(tags: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(tag) {
            out.push(*tag);
        }
    }
    out
}

/// Word-by-word reading preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPreferences {
    pub selected_word_by_word_locale: String,

    /// Whether the selected locale is the default for the UI language
    #[serde(default)]
    pub is_using_default_word_by_word_locale: bool,

    pub word_by_word_display: Vec<WordByWordDisplay>,

    pub word_by_word_content_type: Vec<WordByWordType>,

    pub word_click_functionality: WordClickFunctionality,
}

impl ReadingPreferences {
    /// Defaults for a UI language.
    pub fn defaults_for(ui_language: &str) -> Self {
        Self {
            selected_word_by_word_locale: default_wbw_locale_for(ui_language).to_string(),
            is_using_default_word_by_word_locale: true,
            word_by_word_display: vec![WordByWordDisplay::Tooltip],
            word_by_word_content_type: vec![WordByWordType::Translation],
            word_click_functionality: WordClickFunctionality::PlayAudio,
        }
    }

    /// Display toggles only do something while some content type is on.
    pub fn display_toggles_disabled(&self) -> bool {
        self.word_by_word_content_type.is_empty()
    }
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self::defaults_for(DEFAULT_WBW_LOCALE)
    }
}

/// Partial reading preferences, as stored in a backend group record.
/// Only provided fields are applied.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialReadingPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_word_by_word_locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_by_word_display: Option<Vec<WordByWordDisplay>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_by_word_content_type: Option<Vec<WordByWordType>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_click_functionality: Option<WordClickFunctionality>,
}

impl From<ReadingPreferences> for PartialReadingPreferences {
    fn from(prefs: ReadingPreferences) -> Self {
        Self {
            selected_word_by_word_locale: Some(prefs.selected_word_by_word_locale),
            word_by_word_display: Some(prefs.word_by_word_display),
            word_by_word_content_type: Some(prefs.word_by_word_content_type),
            word_click_functionality: Some(prefs.word_click_functionality),
        }
    }
}

impl PartialReadingPreferences {
    /// Apply onto full preferences. Unsupported locales are skipped.
    pub fn apply_to(&self, prefs: &mut ReadingPreferences, ui_language: &str) {
        if let Some(ref locale) = self.selected_word_by_word_locale {
            if is_supported_wbw_locale(locale) {
                prefs.selected_word_by_word_locale = locale.clone();
                prefs.is_using_default_word_by_word_locale =
                    locale == default_wbw_locale_for(ui_language);
            }
        }
        if let Some(ref display) = self.word_by_word_display {
            prefs.word_by_word_display = dedup_tags(display);
        }
        if let Some(ref content) = self.word_by_word_content_type {
            prefs.word_by_word_content_type = dedup_tags(content);
        }
        if let Some(click) = self.word_click_functionality {
            prefs.word_click_functionality = click;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_for_ui_language() {
        assert_eq!(default_wbw_locale_for("ur"), "ur");
        assert_eq!(default_wbw_locale_for("inh"), "inh");
        assert_eq!(default_wbw_locale_for("fr"), "en");
        assert_eq!(default_wbw_locale_for(""), "en");
    }

    #[test]
    fn test_every_locale_has_a_name() {
        for code in WBW_LOCALES {
            assert_ne!(locale_name(code), "Unknown", "missing name for {}", code);
        }
    }

    #[test]
    fn test_toggle_tag_no_duplicates() {
        let set = vec![WordByWordDisplay::Tooltip];
        let next = toggle_tag(&set, WordByWordDisplay::Tooltip, true);
        assert_eq!(next, vec![WordByWordDisplay::Tooltip]);

        let next = toggle_tag(&set, WordByWordDisplay::Inline, true);
        assert_eq!(next, vec![WordByWordDisplay::Tooltip, WordByWordDisplay::Inline]);

        let next = toggle_tag(&next, WordByWordDisplay::Tooltip, false);
        assert_eq!(next, vec![WordByWordDisplay::Inline]);

        // Removing an absent tag is a no-op
        let next = toggle_tag(&next, WordByWordDisplay::Tooltip, false);
        assert_eq!(next, vec![WordByWordDisplay::Inline]);
    }

    #[test]
    fn test_click_functionality_swap() {
        assert_eq!(
            WordClickFunctionality::from_enabled(true),
            WordClickFunctionality::PlayAudio
        );
        assert_eq!(
            WordClickFunctionality::PlayAudio.swapped(),
            WordClickFunctionality::NoAudio
        );
        assert_eq!(
            WordClickFunctionality::NoAudio.swapped().swapped(),
            WordClickFunctionality::NoAudio
        );
    }

    #[test]
    fn test_partial_apply() {
        let mut prefs = ReadingPreferences::defaults_for("en");
        let partial: PartialReadingPreferences = serde_json::from_value(serde_json::json!({
            "selectedWordByWordLocale": "fa",
            "wordByWordDisplay": ["inline", "inline", "tooltip"],
            "unknownKey": 42
        }))
        .unwrap();

        partial.apply_to(&mut prefs, "en");
        assert_eq!(prefs.selected_word_by_word_locale, "fa");
        assert!(!prefs.is_using_default_word_by_word_locale);
        assert_eq!(
            prefs.word_by_word_display,
            vec![WordByWordDisplay::Inline, WordByWordDisplay::Tooltip]
        );
        assert_eq!(prefs.word_by_word_content_type, vec![WordByWordType::Translation]); // Unchanged
    }

    #[test]
    fn test_partial_apply_skips_unsupported_locale() {
        let mut prefs = ReadingPreferences::default();
        let partial = PartialReadingPreferences {
            selected_word_by_word_locale: Some("xx".to_string()),
            ..Default::default()
        };

        partial.apply_to(&mut prefs, "en");
        assert_eq!(prefs.selected_word_by_word_locale, "en");
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(ReadingPreferences::default()).unwrap();
        assert_eq!(json["selectedWordByWordLocale"], "en");
        assert_eq!(json["wordByWordDisplay"][0], "tooltip");
        assert_eq!(json["wordByWordContentType"][0], "translation");
        assert_eq!(json["wordClickFunctionality"], "play-audio");
    }

    #[test]
    fn test_full_snapshot_as_partial_is_normalized() {
        let mut prefs = ReadingPreferences::defaults_for("ur");
        let saved = ReadingPreferences {
            selected_word_by_word_locale: "ur".to_string(),
            is_using_default_word_by_word_locale: false,
            word_by_word_display: vec![WordByWordDisplay::Inline, WordByWordDisplay::Inline],
            word_by_word_content_type: vec![],
            word_click_functionality: WordClickFunctionality::NoAudio,
        };

        PartialReadingPreferences::from(saved).apply_to(&mut prefs, "ur");
        assert!(prefs.is_using_default_word_by_word_locale);
        assert_eq!(prefs.word_by_word_display, vec![WordByWordDisplay::Inline]);
        assert!(prefs.word_by_word_content_type.is_empty());
        assert_eq!(prefs.word_click_functionality, WordClickFunctionality::NoAudio);
    }
}
