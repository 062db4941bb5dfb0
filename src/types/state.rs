//! Shared application state and the action descriptors that mutate it.

use serde::{Deserialize, Serialize};

use super::reading::{
    default_wbw_locale_for, ReadingPreferences, WordByWordDisplay, WordByWordType,
    WordClickFunctionality,
};

/// Navbar chrome state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarState {
    pub is_settings_drawer_open: bool,
}

/// Reading-preference actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ReadingAction {
    /// `locale` is the UI language at dispatch time.
    SetSelectedWordByWordLocale { value: String, locale: String },
    SetWordByWordDisplay(Vec<WordByWordDisplay>),
    SetWordByWordContentType(Vec<WordByWordType>),
    SetWordClickFunctionality(WordClickFunctionality),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum NavbarAction {
    SetIsSettingsDrawerOpen(bool),
}

/// Any action the store accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Reading(ReadingAction),
    Navbar(NavbarAction),
}

impl From<ReadingAction> for Action {
    fn from(action: ReadingAction) -> Self {
        Self::Reading(action)
    }
}

impl From<NavbarAction> for Action {
    fn from(action: NavbarAction) -> Self {
        Self::Navbar(action)
    }
}

/// Everything held in the shared store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub reading: ReadingPreferences,
    pub navbar: NavbarState,
}

impl AppState {
    pub fn new(reading: ReadingPreferences) -> Self {
        Self {
            reading,
            navbar: NavbarState::default(),
        }
    }

    /// Apply an action in place.
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::Reading(action) => reduce_reading(&mut self.reading, action),
            Action::Navbar(NavbarAction::SetIsSettingsDrawerOpen(open)) => {
                self.navbar.is_settings_drawer_open = *open;
            }
        }
    }
}

fn reduce_reading(state: &mut ReadingPreferences, action: &ReadingAction) {
    match action {
        ReadingAction::SetSelectedWordByWordLocale { value, locale } => {
            state.selected_word_by_word_locale = value.clone();
            state.is_using_default_word_by_word_locale = value == default_wbw_locale_for(locale);
        }
        ReadingAction::SetWordByWordDisplay(display) => {
            state.word_by_word_display = display.clone();
        }
        ReadingAction::SetWordByWordContentType(content) => {
            state.word_by_word_content_type = content.clone();
        }
        ReadingAction::SetWordClickFunctionality(click) => {
            state.word_click_functionality = *click;
        }
    }
}
