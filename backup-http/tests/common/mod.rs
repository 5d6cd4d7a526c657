use std::sync::Arc;

use backup_core::{BackupService, InMemoryBackupStore, SteppingClock};
use backup_http::server::AppState;

/// Create a test AppState for testing.
///
/// The returned store handle shares records with the state, and the clock
/// steps one millisecond per read so consecutive saves get distinct ids.
pub fn create_test_state() -> (AppState, InMemoryBackupStore) {
    let store = InMemoryBackupStore::new();
    let service =
        BackupService::new(Arc::new(store.clone())).with_clock(Arc::new(SteppingClock::default()));

    (AppState::from_service(service), store)
}
