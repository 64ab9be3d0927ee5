use crate::storage::StorageBackend;
use crate::store::WorkoutStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<WorkoutStore<StorageBackend>>>,
}

impl AppState {
    pub fn new(store: WorkoutStore<StorageBackend>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
