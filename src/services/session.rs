/**
 * Session Bootstrap
 *
 * Builds the store and everything hanging off it for one session.
 *
 * Initial reading preferences, later sources winning:
 * - Defaults for the UI language
 * - Client-side snapshot for the identity
 * - Remote record of the reading group (signed-in only)
 * - `wbwLocale` query parameter of the starting URL
 */

use crate::config::Config;
use crate::error::Result;
use crate::services::analytics::{AnalyticsSink, TracingAnalytics};
use crate::services::navigation::wbw_locale_from_url;
use crate::services::{
    HttpPreferenceBackend, LocalStateStore, PreferenceBackend, PreferenceStore, QueryRouter,
    SettingsDrawer, UpdateCoordinator, WordByWordController,
};
use crate::types::{
    default_wbw_locale_for, AppState, Identity, PartialReadingPreferences, PreferenceGroup,
    ReadingPreferences,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Resolve the reading preferences a session starts with.
pub async fn initial_reading_preferences(
    ui_language: &str,
    identity: &Identity,
    local: Option<&LocalStateStore>,
    backend: Option<&dyn PreferenceBackend>,
    url: &Url,
) -> ReadingPreferences {
    let mut prefs = ReadingPreferences::defaults_for(ui_language);

    if let Some(local) = local {
        match local.load(identity.storage_key()) {
            Ok(Some(saved)) => {
                debug!("Restored local reading state");
                PartialReadingPreferences::from(saved).apply_to(&mut prefs, ui_language);
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to load local reading state: {}", e),
        }
    }

    if let (true, Some(backend)) = (identity.is_authenticated(), backend) {
        match backend.fetch_group(identity, PreferenceGroup::Reading).await {
            Ok(record) => {
                match serde_json::from_value::<PartialReadingPreferences>(record.into()) {
                    Ok(partial) => partial.apply_to(&mut prefs, ui_language),
                    Err(e) => warn!("Ignoring malformed remote reading record: {}", e),
                }
            }
            Err(e) => warn!("Failed to fetch remote reading preferences: {}", e),
        }
    }

    if let Some(locale) = wbw_locale_from_url(url) {
        prefs.is_using_default_word_by_word_locale = locale == default_wbw_locale_for(ui_language);
        prefs.selected_word_by_word_locale = locale;
    }

    prefs
}

/// One user session.
pub struct Session {
    identity: Identity,
    store: PreferenceStore,
    coordinator: UpdateCoordinator,
    drawer: SettingsDrawer,
    router: QueryRouter,
    local: Option<Arc<LocalStateStore>>,
}

impl Session {
    /// Build a session from configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backend = match config.preferences_api_url {
            Some(ref url) => {
                let http = HttpPreferenceBackend::new(
                    url.as_str(),
                    Duration::from_millis(config.persist_timeout_ms),
                )?;
                Some(Arc::new(http) as Arc<dyn PreferenceBackend>)
            }
            None => None,
        };

        let local = match LocalStateStore::new(&config.local_state_path) {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                warn!("Local state disabled: {}", e);
                None
            }
        };

        Self::bootstrap(
            config.identity(),
            &config.ui_language,
            &config.page_url,
            backend,
            local,
            Arc::new(TracingAnalytics),
        )
        .await
    }

    /// Build a session from explicit parts.
    pub async fn bootstrap(
        identity: Identity,
        ui_language: &str,
        page_url: &str,
        backend: Option<Arc<dyn PreferenceBackend>>,
        local: Option<Arc<LocalStateStore>>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Result<Self> {
        let router = QueryRouter::new(page_url)?;

        let reading = initial_reading_preferences(
            ui_language,
            &identity,
            local.as_deref(),
            backend.as_deref(),
            &router.current_url(),
        )
        .await;

        let store = PreferenceStore::new(AppState::new(reading));
        let coordinator = UpdateCoordinator::new(store.clone(), identity.clone(), backend);
        let controller =
            WordByWordController::new(coordinator.clone(), analytics, router.clone(), ui_language);
        let drawer = SettingsDrawer::new(store.clone(), controller);

        info!(
            "Session started ({})",
            if identity.is_authenticated() { "signed in" } else { "anonymous" }
        );

        Ok(Self {
            identity,
            store,
            coordinator,
            drawer,
            router,
            local,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn coordinator(&self) -> &UpdateCoordinator {
        &self.coordinator
    }

    pub fn drawer(&self) -> &SettingsDrawer {
        &self.drawer
    }

    /// URL as currently shown, including shallow query updates.
    pub fn current_url(&self) -> Url {
        self.router.current_url()
    }

    /// Save the current reading state client-side.
    ///
    /// Outstanding persistence calls are not waited for; use `shutdown` when
    /// the session is ending.
    pub fn save_local(&self) -> Result<()> {
        if let Some(ref local) = self.local {
            local.save(self.identity.storage_key(), &self.store.reading())?;
        }
        Ok(())
    }

    /// Settle outstanding persistence calls, then save client-side state.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        let abandoned = self.coordinator.settle(timeout).await;
        if abandoned > 0 {
            warn!("Rolled back {} unsaved preference change(s)", abandoned);
        }
        self.save_local()
    }
}
