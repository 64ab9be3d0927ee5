use crate::errors::StorageError;
use crate::id::new_workout_id;
use crate::models::{NewWorkout, Workout};
use crate::storage::WorkoutRepository;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// Not hydrated yet; the collection is unknown, not empty.
    Uninitialized,
    Ready,
    /// Memory-only. Nothing is retained across restarts.
    Degraded,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
        }
    }
}

/// Single source of truth for the workout collection.
///
/// Every mutation is written through to the repository before it returns,
/// unless the store has degraded to memory-only operation.
pub struct WorkoutStore<R> {
    repository: R,
    workouts: Vec<Workout>,
    status: StoreStatus,
}

impl<R: WorkoutRepository> WorkoutStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            workouts: Vec::new(),
            status: StoreStatus::Uninitialized,
        }
    }

    pub async fn open(repository: R) -> Self {
        let mut store = Self::new(repository);
        store.hydrate().await;
        store
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    pub fn is_hydrated(&self) -> bool {
        self.status != StoreStatus::Uninitialized
    }

    /// The current collection in stored order. Empty until hydrated.
    pub fn workouts(&self) -> &[Workout] {
        if self.is_hydrated() {
            &self.workouts
        } else {
            &[]
        }
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts().iter().find(|workout| workout.id == id)
    }

    /// Loads the durable slot once. Later calls are no-ops.
    pub async fn hydrate(&mut self) -> StoreStatus {
        if self.is_hydrated() {
            return self.status;
        }

        let pending = std::mem::take(&mut self.workouts);
        let (loaded, status) = match self.repository.load().await {
            Ok(Some(workouts)) => (workouts, StoreStatus::Ready),
            Ok(None) => (Vec::new(), StoreStatus::Ready),
            Err(err @ StorageError::Corrupt(_)) => {
                warn!("discarding stored workouts: {err}");
                (Vec::new(), StoreStatus::Ready)
            }
            Err(err) => {
                warn!("workouts will not be retained across restarts: {err}");
                (Vec::new(), StoreStatus::Degraded)
            }
        };

        self.workouts = loaded;
        self.status = status;

        let has_pending = !pending.is_empty();
        for workout in pending {
            if self.workouts.iter().all(|existing| existing.id != workout.id) {
                self.workouts.push(workout);
            }
        }
        if has_pending {
            self.persist().await;
        }

        info!(count = self.workouts.len(), status = ?self.status, "workouts hydrated");
        self.status
    }

    pub async fn add(&mut self, input: NewWorkout) -> Workout {
        let mut id = new_workout_id();
        while self.workouts.iter().any(|existing| existing.id == id) {
            id = new_workout_id();
        }

        let workout = input.with_id(id);
        self.workouts.push(workout.clone());
        self.persist().await;
        info!(id = %workout.id, title = %workout.title, "workout added");
        workout
    }

    /// Removes the workout if present. Returns whether anything was removed.
    pub async fn remove(&mut self, id: &str) -> bool {
        let before = self.workouts.len();
        self.workouts.retain(|workout| workout.id != id);
        let removed = self.workouts.len() != before;
        self.persist().await;
        if removed {
            info!(id, "workout removed");
        }
        removed
    }

    async fn persist(&mut self) {
        if self.status != StoreStatus::Ready {
            return;
        }
        if let Err(err) = self.repository.save(&self.workouts).await {
            warn!("falling back to memory-only workouts: {err}");
            self.status = StoreStatus::Degraded;
        }
    }
}
