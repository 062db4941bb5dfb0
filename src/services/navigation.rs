/**
 * Navigation Query Sync
 *
 * Keeps preference-carrying query parameters on the current URL.
 * Updates are shallow: only the query string changes, nothing reloads.
 */

use crate::error::Result;
use crate::types::is_supported_wbw_locale;
use std::sync::{Arc, RwLock};
use tracing::debug;
use url::Url;

/// Query parameters the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    WbwLocale,
}

impl QueryParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WbwLocale => "wbwLocale",
        }
    }
}

/// Holds the current navigable URL.
#[derive(Clone)]
pub struct QueryRouter {
    url: Arc<RwLock<Url>>,
}

impl QueryRouter {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: Arc::new(RwLock::new(Url::parse(url)?)),
        })
    }

    /// Current URL.
    pub fn current_url(&self) -> Url {
        self.url
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Value of a query parameter on the current URL.
    pub fn query_param(&self, param: QueryParam) -> Option<String> {
        query_value(&self.current_url(), param)
    }

    /// Set a query parameter in place, keeping the others.
    pub fn set_query_param(&self, param: QueryParam, value: &str) {
        let mut url = self.url.write().unwrap_or_else(|poisoned| poisoned.into_inner());

        let others: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| name != param.as_str())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(others)
            .append_pair(param.as_str(), value);

        debug!("Shallow route update: {}", url);
    }
}

fn query_value(url: &Url, param: QueryParam) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == param.as_str())
        .map(|(_, value)| value.into_owned())
}

/// Word-by-word locale carried by a URL, if present and supported.
pub fn wbw_locale_from_url(url: &Url) -> Option<String> {
    query_value(url, QueryParam::WbwLocale).filter(|code| is_supported_wbw_locale(code))
}
