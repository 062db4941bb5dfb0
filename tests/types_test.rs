//! Unit tests for types module

use reading_settings::types::*;

#[test]
fn test_display_names() {
    assert_eq!(format!("{}", WordByWordDisplay::Inline), "inline");
    assert_eq!(format!("{}", WordByWordDisplay::Tooltip), "tooltip");
    assert_eq!(format!("{}", WordByWordType::Transliteration), "transliteration");
    assert_eq!(format!("{}", WordClickFunctionality::NoAudio), "no-audio");
    assert_eq!(format!("{}", PreferenceKey::WordByWordContentType), "wordByWordContentType");
}

#[test]
fn test_enum_serialization_matches_display() {
    let json = serde_json::to_string(&WordClickFunctionality::PlayAudio).unwrap();
    assert_eq!(json, "\"play-audio\"");

    let parsed: WordByWordType = serde_json::from_str("\"translation\"").unwrap();
    assert_eq!(parsed, WordByWordType::Translation);

    let parsed: PreferenceGroup = serde_json::from_str("\"quranReaderStyles\"").unwrap();
    assert_eq!(parsed, PreferenceGroup::QuranReaderStyles);
}

#[test]
fn test_supported_locales() {
    assert_eq!(WBW_LOCALES.len(), 11);
    assert!(is_supported_wbw_locale("inh"));
    assert!(is_supported_wbw_locale("ta"));
    assert!(!is_supported_wbw_locale("EN"));
    assert!(!is_supported_wbw_locale("ar"));
}

#[test]
fn test_reading_preferences_from_stored_json() {
    let prefs: ReadingPreferences = serde_json::from_value(serde_json::json!({
        "selectedWordByWordLocale": "tr",
        "wordByWordDisplay": ["inline", "tooltip"],
        "wordByWordContentType": ["translation", "transliteration"],
        "wordClickFunctionality": "no-audio"
    }))
    .unwrap();

    assert_eq!(prefs.selected_word_by_word_locale, "tr");
    assert!(!prefs.is_using_default_word_by_word_locale); // Defaulted by serde
    assert_eq!(prefs.word_by_word_display.len(), 2);
    assert_eq!(prefs.word_click_functionality, WordClickFunctionality::NoAudio);
    assert!(!prefs.display_toggles_disabled());
}

#[test]
fn test_action_serialization() {
    let action = Action::from(ReadingAction::SetWordByWordDisplay(vec![WordByWordDisplay::Inline]));
    let json = serde_json::to_value(&action).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "reading": { "type": "setWordByWordDisplay", "payload": ["inline"] }
        })
    );
}
