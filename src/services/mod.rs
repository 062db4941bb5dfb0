pub mod analytics;
pub mod backend;
pub mod controller;
pub mod coordinator;
pub mod drawer;
pub mod local_store;
pub mod navigation;
pub mod session;
pub mod store;

pub use analytics::{AnalyticsSink, TracingAnalytics};
pub use backend::{HttpPreferenceBackend, PreferenceBackend};
pub use controller::{PendingPersist, WordByWordController};
pub use coordinator::{Notice, UpdateCoordinator};
pub use drawer::{SettingsBody, SettingsDrawer, WordByWordSectionView};
pub use local_store::LocalStateStore;
pub use navigation::{QueryParam, QueryRouter};
pub use session::Session;
pub use store::PreferenceStore;
