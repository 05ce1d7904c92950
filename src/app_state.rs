// src/app_state.rs

use std::sync::{Mutex, MutexGuard};

use crate::export::TextExporter;
use crate::store::Store;

pub struct AppState {
    pub store: Mutex<Store>,
    pub exporter: TextExporter,
}

impl AppState {
    /// Handlers hold the lock for the whole operation; this is a
    /// single-writer record manager, not a concurrent datastore.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("store mutex poisoned")
    }
}
