/**
 * Update Coordinator
 *
 * Single write path for preference changes.
 *
 * Flow:
 * - Forward action is dispatched to the store right away (optimistic)
 * - Anonymous sessions stop there
 * - Signed-in sessions persist in a background task; on failure the
 *   inverse action is dispatched and a notice is published
 *
 * Calls are not serialized per key. Two quick toggles race, and the
 * backend keeps whichever request it handles last.
 *
 * Before shutdown, `settle` waits for outstanding calls. Whatever is still
 * outstanding when the wait runs out is aborted and rolled back, so the
 * store never ends up holding a value the backend did not confirm.
 */

use crate::error::AppError;
use crate::services::{PreferenceBackend, PreferenceStore};
use crate::types::{Identity, PreferenceGroup, PreferenceKey, PreferenceUpdate};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, Notify};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

/// Outcome of a persistence attempt, for toasts and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Persisted {
        key: PreferenceKey,
        group: PreferenceGroup,
    },
    PersistFailed {
        key: PreferenceKey,
        group: PreferenceGroup,
        message: String,
    },
}

/// An update whose persistence has not finished yet.
struct Pending {
    update: PreferenceUpdate,
    abort: Option<AbortHandle>,
}

/// Bookkeeping shared by the coordinator and its persistence tasks.
#[derive(Default)]
struct Tracker {
    counts: DashMap<PreferenceGroup, usize>,
    pending: DashMap<u64, Pending>,
    next_id: AtomicU64,
    idle: Notify,
}

/// Marks one persistence call as in flight while alive.
struct InFlight {
    tracker: Arc<Tracker>,
    id: u64,
    group: PreferenceGroup,
}

impl InFlight {
    fn start(tracker: Arc<Tracker>, update: &PreferenceUpdate) -> Self {
        let id = tracker.next_id.fetch_add(1, Ordering::Relaxed);
        *tracker.counts.entry(update.group).or_insert(0) += 1;
        tracker.pending.insert(
            id,
            Pending {
                update: update.clone(),
                abort: None,
            },
        );
        Self {
            tracker,
            id,
            group: update.group,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.tracker.pending.remove(&self.id);
        if let Some(mut count) = self.tracker.counts.get_mut(&self.group) {
            *count = count.saturating_sub(1);
        }
        self.tracker
            .counts
            .remove_if(&self.group, |_, count| *count == 0);
        self.tracker.idle.notify_waiters();
    }
}

/// Applies preference updates optimistically and persists them.
#[derive(Clone)]
pub struct UpdateCoordinator {
    store: PreferenceStore,
    identity: Identity,
    backend: Option<Arc<dyn PreferenceBackend>>,
    tracker: Arc<Tracker>,
    notices: broadcast::Sender<Notice>,
}

impl UpdateCoordinator {
    pub fn new(
        store: PreferenceStore,
        identity: Identity,
        backend: Option<Arc<dyn PreferenceBackend>>,
    ) -> Self {
        let (notices, _) = broadcast::channel(64);
        Self {
            store,
            identity,
            backend,
            tracker: Arc::new(Tracker::default()),
            notices,
        }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Subscribe to persistence notices.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Whether a persistence call for the group is outstanding.
    pub fn is_loading(&self, group: PreferenceGroup) -> bool {
        self.tracker
            .counts
            .get(&group)
            .map(|count| *count > 0)
            .unwrap_or(false)
    }

    /// Number of updates still waiting on the backend.
    pub fn pending(&self) -> usize {
        self.tracker.pending.len()
    }

    /// Apply an update.
    ///
    /// The forward action is in the store when this returns. The returned
    /// handle resolves once persistence (and any rollback) is done; it is
    /// `None` when nothing is persisted.
    ///
    /// Persistence runs on the current tokio runtime. Outside of one, a
    /// signed-in update is rolled back right away.
    pub fn apply(&self, update: PreferenceUpdate) -> Option<JoinHandle<()>> {
        self.store.dispatch(update.forward.clone());

        if !self.identity.is_authenticated() {
            debug!("Anonymous session, {} kept locally", update.key);
            return None;
        }

        let Some(backend) = self.backend.clone() else {
            self.roll_back(&update, &AppError::BackendUnavailable);
            return None;
        };

        let Ok(runtime) = Handle::try_current() else {
            self.roll_back(&update, &AppError::NoRuntime);
            return None;
        };

        let guard = InFlight::start(self.tracker.clone(), &update);
        let id = guard.id;
        let this = self.clone();

        let handle = runtime.spawn(async move {
            let _guard = guard;
            let result = backend
                .persist(&this.identity, update.group, update.key, &update.value)
                .await;

            match result {
                Ok(()) => {
                    info!("Saved {}.{}", update.group, update.key);
                    this.notify(Notice::Persisted {
                        key: update.key,
                        group: update.group,
                    });
                }
                Err(e) => this.roll_back(&update, &e),
            }
        });

        if let Some(mut pending) = self.tracker.pending.get_mut(&id) {
            pending.abort = Some(handle.abort_handle());
        }
        Some(handle)
    }

    /// Wait up to `timeout` for outstanding persistence calls.
    ///
    /// Calls still outstanding afterwards are aborted and rolled back, newest
    /// first. Returns how many were abandoned.
    pub async fn settle(&self, timeout: Duration) -> usize {
        if tokio::time::timeout(timeout, self.wait_idle()).await.is_ok() {
            return 0;
        }

        let mut ids: Vec<u64> = self.tracker.pending.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));

        let mut abandoned = 0;
        for id in ids {
            let Some((_, pending)) = self.tracker.pending.remove(&id) else {
                continue;
            };
            if let Some(abort) = pending.abort {
                abort.abort();
            }
            self.roll_back(&pending.update, &AppError::PersistTimedOut);
            abandoned += 1;
        }
        abandoned
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.tracker.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.tracker.pending.is_empty() {
                return;
            }
            notified.await;
        }
    }

    fn roll_back(&self, update: &PreferenceUpdate, error: &AppError) {
        if error.is_persistence() {
            warn!(
                "Failed to persist {}.{}, rolling back: {}",
                update.group, update.key, error
            );
        } else {
            error!(
                "Could not start persisting {}.{}, rolling back: {}",
                update.group, update.key, error
            );
        }
        self.store.dispatch(update.inverse.clone());
        self.notify(Notice::PersistFailed {
            key: update.key,
            group: update.group,
            message: error.to_string(),
        });
    }

    fn notify(&self, notice: Notice) {
        if self.notices.send(notice).is_err() {
            debug!("No notice subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::BackendFuture;
    use crate::types::{AppState, Change, PreferenceValue, WordClickFunctionality};
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend that waits for a signal, then answers with a fixed outcome.
    struct ScriptedBackend {
        fail: bool,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedBackend {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    impl PreferenceBackend for ScriptedBackend {
        fn persist<'a>(
            &'a self,
            _identity: &'a Identity,
            _group: PreferenceGroup,
            _key: PreferenceKey,
            _value: &'a PreferenceValue,
        ) -> BackendFuture<'a, ()> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(ref gate) = self.gate {
                    gate.notified().await;
                }
                if self.fail {
                    Err(AppError::BackendRejected {
                        status: 500,
                        message: "boom".to_string(),
                    })
                } else {
                    Ok(())
                }
            })
        }

        fn fetch_group<'a>(
            &'a self,
            _identity: &'a Identity,
            _group: PreferenceGroup,
        ) -> BackendFuture<'a, Map<String, Value>> {
            Box::pin(async move { Ok(Map::new()) })
        }
    }

    fn signed_in() -> Identity {
        Identity::Authenticated {
            user_id: "user-1".to_string(),
            token: "token".to_string(),
        }
    }

    fn audio_off() -> PreferenceUpdate {
        Change::new(
            WordClickFunctionality::PlayAudio,
            WordClickFunctionality::NoAudio,
            PreferenceGroup::Reading,
            "en",
        )
        .into_update()
    }

    #[tokio::test]
    async fn test_success_keeps_forward_value() {
        let store = PreferenceStore::new(AppState::default());
        let backend = Arc::new(ScriptedBackend::new(false));
        let coordinator = UpdateCoordinator::new(store.clone(), signed_in(), Some(backend.clone()));
        let mut notices = coordinator.subscribe();

        let handle = coordinator.apply(audio_off()).unwrap();
        handle.await.unwrap();

        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::NoAudio
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::Persisted {
                key: PreferenceKey::WordClickFunctionality,
                group: PreferenceGroup::Reading,
            }
        );
    }

    #[tokio::test]
    async fn test_failure_rolls_back() {
        let store = PreferenceStore::new(AppState::default());
        let coordinator = UpdateCoordinator::new(
            store.clone(),
            signed_in(),
            Some(Arc::new(ScriptedBackend::new(true))),
        );
        let mut notices = coordinator.subscribe();

        let handle = coordinator.apply(audio_off()).unwrap();
        // Optimistic value is visible before persistence finishes
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::NoAudio
        );

        handle.await.unwrap();
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::PlayAudio
        );
        assert!(matches!(
            notices.recv().await.unwrap(),
            Notice::PersistFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_anonymous_skips_persistence() {
        let store = PreferenceStore::new(AppState::default());
        let backend = Arc::new(ScriptedBackend::new(true));
        let coordinator =
            UpdateCoordinator::new(store.clone(), Identity::Anonymous, Some(backend.clone()));

        assert!(coordinator.apply(audio_off()).is_none());
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::NoAudio
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(!coordinator.is_loading(PreferenceGroup::Reading));
    }

    #[tokio::test]
    async fn test_missing_backend_rolls_back_immediately() {
        let store = PreferenceStore::new(AppState::default());
        let coordinator = UpdateCoordinator::new(store.clone(), signed_in(), None);

        assert!(coordinator.apply(audio_off()).is_none());
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::PlayAudio
        );
    }

    #[tokio::test]
    async fn test_is_loading_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend {
            fail: false,
            calls: AtomicUsize::new(0),
            gate: Some(gate.clone()),
        });
        let coordinator =
            UpdateCoordinator::new(PreferenceStore::default(), signed_in(), Some(backend));

        let handle = coordinator.apply(audio_off()).unwrap();
        assert!(coordinator.is_loading(PreferenceGroup::Reading));
        assert!(!coordinator.is_loading(PreferenceGroup::Audio));

        gate.notify_one();
        handle.await.unwrap();
        assert!(!coordinator.is_loading(PreferenceGroup::Reading));
    }

    #[tokio::test]
    async fn test_settle_waits_for_outstanding_failure() {
        let store = PreferenceStore::new(AppState::default());
        let coordinator = UpdateCoordinator::new(
            store.clone(),
            signed_in(),
            Some(Arc::new(ScriptedBackend::new(true))),
        );

        // Handle dropped, as the command loop does
        drop(coordinator.apply(audio_off()));
        assert_eq!(coordinator.pending(), 1);

        assert_eq!(coordinator.settle(Duration::from_secs(5)).await, 0);
        assert_eq!(coordinator.pending(), 0);
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::PlayAudio
        );
    }

    #[tokio::test]
    async fn test_settle_rolls_back_stuck_calls() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend {
            fail: false,
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        });
        let store = PreferenceStore::new(AppState::default());
        let coordinator = UpdateCoordinator::new(store.clone(), signed_in(), Some(backend));
        let mut notices = coordinator.subscribe();

        let handle = coordinator.apply(audio_off()).unwrap();
        assert_eq!(coordinator.settle(Duration::from_millis(20)).await, 1);

        assert!(handle.await.unwrap_err().is_cancelled());
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::PlayAudio
        );
        assert!(!coordinator.is_loading(PreferenceGroup::Reading));
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::PersistFailed {
                key: PreferenceKey::WordClickFunctionality,
                group: PreferenceGroup::Reading,
                message: AppError::PersistTimedOut.to_string(),
            }
        );
    }

    #[test]
    fn test_apply_outside_runtime_rolls_back() {
        let store = PreferenceStore::new(AppState::default());
        let coordinator = UpdateCoordinator::new(
            store.clone(),
            signed_in(),
            Some(Arc::new(ScriptedBackend::new(false))),
        );

        assert!(coordinator.apply(audio_off()).is_none());
        assert_eq!(
            store.reading().word_click_functionality,
            WordClickFunctionality::PlayAudio
        );
        assert_eq!(coordinator.pending(), 0);
    }
}
