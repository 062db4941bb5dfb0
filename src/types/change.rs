//! Preference changes and the forward/inverse actions derived from them.

use super::preference::{PreferenceGroup, PreferenceKey, PreferenceValue};
use super::reading::{WordByWordDisplay, WordByWordType, WordClickFunctionality};
use super::state::{Action, ReadingAction};

/// A value type that maps onto exactly one preference key.
pub trait PreferenceField: Clone + Into<PreferenceValue> {
    const KEY: PreferenceKey;

    /// Action that sets this value in the store.
    fn set_action(value: Self, ui_language: &str) -> Action;
}

impl PreferenceField for String {
    const KEY: PreferenceKey = PreferenceKey::SelectedWordByWordLocale;

    fn set_action(value: Self, ui_language: &str) -> Action {
        ReadingAction::SetSelectedWordByWordLocale {
            value,
            locale: ui_language.to_string(),
        }
        .into()
    }
}

impl PreferenceField for WordClickFunctionality {
    const KEY: PreferenceKey = PreferenceKey::WordClickFunctionality;

    fn set_action(value: Self, _ui_language: &str) -> Action {
        ReadingAction::SetWordClickFunctionality(value).into()
    }
}

impl PreferenceField for Vec<WordByWordDisplay> {
    const KEY: PreferenceKey = PreferenceKey::WordByWordDisplay;

    fn set_action(value: Self, _ui_language: &str) -> Action {
        ReadingAction::SetWordByWordDisplay(value).into()
    }
}

impl PreferenceField for Vec<WordByWordType> {
    const KEY: PreferenceKey = PreferenceKey::WordByWordContentType;

    fn set_action(value: Self, _ui_language: &str) -> Action {
        ReadingAction::SetWordByWordContentType(value).into()
    }
}

/// A single user-triggered transition of one preference.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub key: PreferenceKey,
    pub old_value: T,
    pub new_value: T,
    pub group: PreferenceGroup,
    pub ui_language: String,
}

impl<T: PreferenceField> Change<T> {
    pub fn new(old_value: T, new_value: T, group: PreferenceGroup, ui_language: &str) -> Self {
        Self {
            key: T::KEY,
            old_value,
            new_value,
            group,
            ui_language: ui_language.to_string(),
        }
    }

    pub fn forward(&self) -> Action {
        T::set_action(self.new_value.clone(), &self.ui_language)
    }

    pub fn inverse(&self) -> Action {
        T::set_action(self.old_value.clone(), &self.ui_language)
    }

    /// Erase the value type for the coordinator.
    pub fn into_update(self) -> PreferenceUpdate {
        PreferenceUpdate {
            key: self.key,
            forward: self.forward(),
            inverse: self.inverse(),
            value: self.new_value.into(),
            group: self.group,
        }
    }
}

/// What the update coordinator consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceUpdate {
    pub key: PreferenceKey,
    pub value: PreferenceValue,
    pub forward: Action,
    pub inverse: Action,
    pub group: PreferenceGroup,
}
