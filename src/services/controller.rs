/**
 * Word-by-Word Controller
 *
 * One handler per togglable preference family. Each handler computes the
 * next value from the current store state, logs the transition and hands
 * a `Change` to the update coordinator.
 */

use crate::error::{AppError, Result};
use crate::services::analytics::{event_value, AnalyticsSink};
use crate::services::navigation::{QueryParam, QueryRouter};
use crate::services::{PreferenceStore, UpdateCoordinator};
use crate::types::{
    is_supported_wbw_locale, toggle_tag, Change, PreferenceField, PreferenceGroup,
    ReadingPreferences, WordByWordDisplay, WordByWordType, WordClickFunctionality,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a background persistence call, if one was started.
pub type PendingPersist = Option<JoinHandle<()>>;

/// Handlers behind the word-by-word settings section.
#[derive(Clone)]
pub struct WordByWordController {
    coordinator: UpdateCoordinator,
    analytics: Arc<dyn AnalyticsSink>,
    router: QueryRouter,
    ui_language: String,
}

impl WordByWordController {
    pub fn new(
        coordinator: UpdateCoordinator,
        analytics: Arc<dyn AnalyticsSink>,
        router: QueryRouter,
        ui_language: impl Into<String>,
    ) -> Self {
        Self {
            coordinator,
            analytics,
            router,
            ui_language: ui_language.into(),
        }
    }

    fn store(&self) -> &PreferenceStore {
        self.coordinator.store()
    }

    /// Current reading preferences.
    pub fn preferences(&self) -> ReadingPreferences {
        self.store().reading()
    }

    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    /// Display toggles are inert while no content type is selected.
    pub fn display_toggles_disabled(&self) -> bool {
        self.preferences().display_toggles_disabled()
    }

    /// Whether a reading-group save is outstanding.
    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading(PreferenceGroup::Reading)
    }

    /// Select the word-by-word locale and mirror it into the URL.
    pub fn change_locale(&self, new_locale: &str) -> Result<PendingPersist> {
        if !is_supported_wbw_locale(new_locale) {
            return Err(AppError::InvalidLocale(new_locale.to_string()));
        }

        let old_locale = self.preferences().selected_word_by_word_locale;
        self.log_change("wbw_locale", old_locale.as_str(), new_locale);
        self.router.set_query_param(QueryParam::WbwLocale, new_locale);

        Ok(self.on_settings_change(Change::new(
            old_locale,
            new_locale.to_string(),
            PreferenceGroup::Reading,
            &self.ui_language,
        )))
    }

    /// Turn recitation on word click on or off.
    pub fn change_click_functionality(&self, enable_audio: bool) -> PendingPersist {
        let new_value = WordClickFunctionality::from_enabled(enable_audio);
        let old_value = new_value.swapped();
        self.log_change("audio_settings_word_click_functionality", &old_value, &new_value);

        self.on_settings_change(Change::new(
            old_value,
            new_value,
            PreferenceGroup::Reading,
            &self.ui_language,
        ))
    }

    /// Toggle one display mode.
    pub fn change_display_mode(&self, mode: WordByWordDisplay, enabled: bool) -> PendingPersist {
        let current = self.preferences().word_by_word_display;
        let next = toggle_tag(&current, mode, enabled);
        self.log_change("wbw_display", &current, &next);

        self.on_settings_change(Change::new(
            current,
            next,
            PreferenceGroup::Reading,
            &self.ui_language,
        ))
    }

    /// Toggle one content type.
    pub fn change_content_type(&self, content: WordByWordType, enabled: bool) -> PendingPersist {
        let current = self.preferences().word_by_word_content_type;
        let next = toggle_tag(&current, content, enabled);
        self.log_change("wbw_content_type", &current, &next);

        self.on_settings_change(Change::new(
            current,
            next,
            PreferenceGroup::Reading,
            &self.ui_language,
        ))
    }

    fn log_change<T: Serialize + ?Sized>(&self, name: &str, old_value: &T, new_value: &T) {
        self.analytics
            .log_value_change(name, event_value(&old_value), event_value(&new_value));
    }

    fn on_settings_change<T: PreferenceField>(&self, change: Change<T>) -> PendingPersist {
        debug!("{} change in group {}", change.key, change.group);
        self.coordinator.apply(change.into_update())
    }
}
