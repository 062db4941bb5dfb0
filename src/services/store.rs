/**
 * Preference Store
 *
 * Process-wide state container. Readers take snapshots; writes go through
 * action descriptors only.
 *
 * - Reading preferences are written by the update coordinator
 * - Navbar state is written by the drawer chrome
 * - Every applied action is broadcast to subscribers
 */

use crate::types::{Action, AppState, NavbarAction, ReadingPreferences};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Shared state container.
#[derive(Clone)]
pub struct PreferenceStore {
    state: Arc<RwLock<AppState>>,
    tx: broadcast::Sender<Action>,
}

impl PreferenceStore {
    /// Create a store seeded with the given state.
    pub fn new(initial: AppState) -> Self {
        let (tx, _) = broadcast::channel(256);
        Self {
            state: Arc::new(RwLock::new(initial)),
            tx,
        }
    }

    /// Snapshot of the whole state.
    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    /// Snapshot of the reading preferences.
    pub fn reading(&self) -> ReadingPreferences {
        self.read().reading.clone()
    }

    pub fn is_settings_drawer_open(&self) -> bool {
        self.read().navbar.is_settings_drawer_open
    }

    /// Subscribe to applied actions.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.tx.subscribe()
    }

    /// Apply a navbar action.
    pub fn dispatch_navbar(&self, action: NavbarAction) {
        self.dispatch(action.into());
    }

    /// Apply any action. Reading actions come from the coordinator only.
    pub(crate) fn dispatch(&self, action: Action) {
        self.write().reduce(&action);
        debug!(?action, "Dispatched action");

        if self.tx.send(action).is_err() {
            debug!("No store subscribers");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}
