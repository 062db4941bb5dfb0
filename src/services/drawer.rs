/**
 * Settings Drawer
 *
 * Slide-out drawer chrome and the word-by-word section it hosts.
 *
 * - Open state lives in the store's navbar slice and is read on every render
 * - The body is built on the first render while open, then reused
 * - Section views are derived from current state each time, never cached
 */

use crate::services::{PreferenceStore, WordByWordController};
use crate::types::{
    locale_name, NavbarAction, WordByWordDisplay, WordByWordType, WordClickFunctionality,
    WBW_LOCALES,
};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

/// One entry of the locale select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Locale select options, in catalog order.
pub fn word_by_word_locale_options() -> Vec<LocaleOption> {
    WBW_LOCALES
        .iter()
        .map(|&code| LocaleOption {
            value: code,
            label: locale_name(code),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxView {
    pub id: &'static str,
    pub checked: bool,
    pub disabled: bool,
}

impl CheckboxView {
    fn enabled(id: &'static str, checked: bool) -> Self {
        Self {
            id,
            checked,
            disabled: false,
        }
    }
}

/// Render description of the word-by-word section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordByWordSectionView {
    pub is_loading: bool,
    pub translation: CheckboxView,
    pub transliteration: CheckboxView,
    pub recitation: CheckboxView,
    pub selected_locale: String,
    pub locale_options: Vec<LocaleOption>,
    pub inline: CheckboxView,
    pub tooltip: CheckboxView,
}

/// Drawer body; expensive parts are built once on first open.
pub struct SettingsBody {
    controller: WordByWordController,
    locale_options: Vec<LocaleOption>,
}

impl SettingsBody {
    fn new(controller: WordByWordController) -> Self {
        debug!("Building settings body");
        Self {
            controller,
            locale_options: word_by_word_locale_options(),
        }
    }

    pub fn controller(&self) -> &WordByWordController {
        &self.controller
    }

    pub fn render(&self) -> WordByWordSectionView {
        let prefs = self.controller.preferences();
        let display_disabled = prefs.display_toggles_disabled();
        let content = &prefs.word_by_word_content_type;
        let display = &prefs.word_by_word_display;

        WordByWordSectionView {
            is_loading: self.controller.is_loading(),
            translation: CheckboxView::enabled(
                "wbw-translation",
                content.contains(&WordByWordType::Translation),
            ),
            transliteration: CheckboxView::enabled(
                "wbw-transliteration",
                content.contains(&WordByWordType::Transliteration),
            ),
            recitation: CheckboxView::enabled(
                "wbw-recitation",
                prefs.word_click_functionality == WordClickFunctionality::PlayAudio,
            ),
            selected_locale: prefs.selected_word_by_word_locale.clone(),
            locale_options: self.locale_options.clone(),
            inline: CheckboxView {
                id: "inline",
                checked: display.contains(&WordByWordDisplay::Inline),
                disabled: display_disabled,
            },
            tooltip: CheckboxView {
                id: "tooltip",
                checked: display.contains(&WordByWordDisplay::Tooltip),
                disabled: display_disabled,
            },
        }
    }
}

/// Settings drawer shell.
pub struct SettingsDrawer {
    store: PreferenceStore,
    controller: WordByWordController,
    body: OnceLock<SettingsBody>,
}

impl SettingsDrawer {
    pub fn new(store: PreferenceStore, controller: WordByWordController) -> Self {
        Self {
            store,
            controller,
            body: OnceLock::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.store.is_settings_drawer_open()
    }

    pub fn open(&self) {
        self.store
            .dispatch_navbar(NavbarAction::SetIsSettingsDrawerOpen(true));
    }

    pub fn close(&self) {
        self.store
            .dispatch_navbar(NavbarAction::SetIsSettingsDrawerOpen(false));
    }

    /// Whether the body has been built yet.
    pub fn is_body_loaded(&self) -> bool {
        self.body.get().is_some()
    }

    /// Body while the drawer is open.
    pub fn body(&self) -> Option<&SettingsBody> {
        if !self.is_open() {
            return None;
        }
        Some(
            self.body
                .get_or_init(|| SettingsBody::new(self.controller.clone())),
        )
    }

    /// Section view while open, nothing while closed.
    pub fn render(&self) -> Option<WordByWordSectionView> {
        self.body().map(SettingsBody::render)
    }
}
