use std::env;

use crate::types::Identity;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the preference backend.
    pub preferences_api_url: Option<String>,
    /// Bearer token of the signed-in user.
    pub auth_token: Option<String>,
    /// ID of the signed-in user.
    pub user_id: Option<String>,
    /// Interface language.
    pub ui_language: String,
    /// Navigable URL the session starts on.
    pub page_url: String,
    /// SQLite file holding client-side state.
    pub local_state_path: String,
    /// Timeout for a single backend request (ms).
    pub persist_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            preferences_api_url: env::var("PREFERENCES_API_URL").ok(),
            auth_token: env::var("AUTH_TOKEN").ok(),
            user_id: env::var("USER_ID").ok(),
            ui_language: env::var("UI_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            page_url: env::var("PAGE_URL").unwrap_or_else(|_| "https://quran.com/1".to_string()),
            local_state_path: env::var("LOCAL_STATE_PATH")
                .unwrap_or_else(|_| "reading-settings.db".to_string()),
            persist_timeout_ms: env::var("PERSIST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Identity implied by the configured credentials.
    ///
    /// Both a user ID and a token are needed to count as signed in.
    pub fn identity(&self) -> Identity {
        match (&self.user_id, &self.auth_token) {
            (Some(user_id), Some(token)) if !user_id.is_empty() && !token.is_empty() => {
                Identity::Authenticated {
                    user_id: user_id.clone(),
                    token: token.clone(),
                }
            }
            _ => Identity::Anonymous,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
