/**
 * Preference Backend
 *
 * Durable per-user preference storage behind a small trait, plus the
 * HTTP implementation used by signed-in sessions.
 *
 * Endpoints:
 * - GET  {base}/api/v1/preferences  - All groups for the user
 * - POST {base}/api/v1/preferences  - Add or update one key in a group
 */

use crate::error::{AppError, Result};
use crate::types::{Identity, PreferenceGroup, PreferenceKey, PreferenceValue};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

/// Boxed future returned by backend calls.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Durable storage for a user's preferences.
pub trait PreferenceBackend: Send + Sync {
    /// Store `key = value` under `group` for the identity.
    fn persist<'a>(
        &'a self,
        identity: &'a Identity,
        group: PreferenceGroup,
        key: PreferenceKey,
        value: &'a PreferenceValue,
    ) -> BackendFuture<'a, ()>;

    /// Fetch the stored record of one group.
    fn fetch_group<'a>(
        &'a self,
        identity: &'a Identity,
        group: PreferenceGroup,
    ) -> BackendFuture<'a, Map<String, Value>>;
}

#[derive(Debug, Serialize)]
struct PersistBody<'a> {
    key: PreferenceKey,
    value: &'a PreferenceValue,
    group: PreferenceGroup,
}

/// HTTP preference backend.
pub struct HttpPreferenceBackend {
    client: Client,
    base_url: String,
}

impl HttpPreferenceBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v1/preferences", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        let message = response.text().await.unwrap_or_default();
        warn!("Preference backend returned {}: {}", status, message);
        Err(AppError::BackendRejected {
            status: status.as_u16(),
            message,
        })
    }

    fn token(identity: &Identity) -> Result<&str> {
        match identity {
            Identity::Authenticated { token, .. } => Ok(token.as_str()),
            Identity::Anonymous => Err(AppError::Unauthorized),
        }
    }
}

impl PreferenceBackend for HttpPreferenceBackend {
    fn persist<'a>(
        &'a self,
        identity: &'a Identity,
        group: PreferenceGroup,
        key: PreferenceKey,
        value: &'a PreferenceValue,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let token = Self::token(identity)?;
            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(token)
                .json(&PersistBody { key, value, group })
                .send()
                .await?;
            Self::check(response).await?;

            debug!("Persisted {}.{}", group, key);
            Ok(())
        })
    }

    fn fetch_group<'a>(
        &'a self,
        identity: &'a Identity,
        group: PreferenceGroup,
    ) -> BackendFuture<'a, Map<String, Value>> {
        Box::pin(async move {
            let token = Self::token(identity)?;
            let response = self
                .client
                .get(self.endpoint())
                .bearer_auth(token)
                .send()
                .await?;
            let mut groups: Map<String, Value> = Self::check(response).await?.json().await?;

            match groups.remove(group.as_str()) {
                Some(Value::Object(record)) => Ok(record),
                _ => Ok(Map::new()),
            }
        })
    }
}
