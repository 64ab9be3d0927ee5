use crate::errors::StorageError;
use crate::models::Workout;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::fs;
use tracing::{debug, warn};

/// Durable slot holding the workout collection.
pub trait WorkoutRepository: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> impl Future<Output = Result<Option<Vec<Workout>>, StorageError>> + Send;

    fn save(&self, workouts: &[Workout]) -> impl Future<Output = Result<(), StorageError>> + Send;
}

#[derive(Serialize)]
struct PersistedWorkoutsRef<'a> {
    workouts: &'a [Workout],
}

#[derive(Deserialize)]
struct PersistedRecords {
    workouts: Vec<serde_json::Value>,
}

pub fn encode_workouts(workouts: &[Workout]) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec_pretty(&PersistedWorkoutsRef { workouts }).map_err(StorageError::Encode)
}

/// Decodes the slot record by record. Only a value that is not a
/// `{"workouts": [...]}` document counts as corrupt; single unreadable
/// records are skipped.
pub fn decode_workouts(bytes: &[u8]) -> Result<Vec<Workout>, StorageError> {
    let persisted: PersistedRecords =
        serde_json::from_slice(bytes).map_err(StorageError::Corrupt)?;

    let mut workouts = Vec::with_capacity(persisted.workouts.len());
    for (index, record) in persisted.workouts.into_iter().enumerate() {
        match serde_json::from_value::<Workout>(record.clone()) {
            Ok(workout) => workouts.push(workout),
            Err(err) => match Workout::from_stored_record(&record) {
                Some(workout) => {
                    warn!(index, id = %workout.id, "read stored workout leniently: {err}");
                    workouts.push(workout);
                }
                None => warn!(index, "skipping unreadable stored workout: {err}"),
            },
        }
    }
    Ok(workouts)
}

/// One JSON file on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl WorkoutRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<Vec<Workout>>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => decode_workouts(&bytes).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Unavailable(err)),
        }
    }

    async fn save(&self, workouts: &[Workout]) -> Result<(), StorageError> {
        let payload = encode_workouts(workouts)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        // Write aside and rename so a crash never leaves a truncated file.
        let temp = self.temp_path();
        fs::write(&temp, payload).await?;
        fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), count = workouts.len(), "persisted workouts");
        Ok(())
    }
}

/// Process-local slot. Holds the serialized form so it behaves like a real
/// store, including corrupt values.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable(std::io::Error::other("memory slot poisoned"))
    }
}

impl WorkoutRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<Vec<Workout>>, StorageError> {
        let raw = self.slot.lock().map_err(|_| Self::poisoned())?.clone();
        raw.map(|bytes| decode_workouts(&bytes)).transpose()
    }

    async fn save(&self, workouts: &[Workout]) -> Result<(), StorageError> {
        let payload = encode_workouts(workouts)?;
        *self.slot.lock().map_err(|_| Self::poisoned())? = Some(payload);
        Ok(())
    }
}

/// A slot that is never available; the store runs memory-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRepository;

impl WorkoutRepository for DisabledRepository {
    async fn load(&self) -> Result<Option<Vec<Workout>>, StorageError> {
        Err(StorageError::Disabled)
    }

    async fn save(&self, _workouts: &[Workout]) -> Result<(), StorageError> {
        Err(StorageError::Disabled)
    }
}

/// The repository chosen by configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    File(JsonFileRepository),
    Memory(MemoryRepository),
    Disabled(DisabledRepository),
}

impl WorkoutRepository for StorageBackend {
    async fn load(&self) -> Result<Option<Vec<Workout>>, StorageError> {
        match self {
            Self::File(repo) => repo.load().await,
            Self::Memory(repo) => repo.load().await,
            Self::Disabled(repo) => repo.load().await,
        }
    }

    async fn save(&self, workouts: &[Workout]) -> Result<(), StorageError> {
        match self {
            Self::File(repo) => repo.save(workouts).await,
            Self::Memory(repo) => repo.save(workouts).await,
            Self::Disabled(repo) => repo.save(workouts).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Intensity, NewWorkout};

    fn sample() -> Vec<Workout> {
        vec![
            NewWorkout {
                title: "Morning Run".into(),
                performed_at: "2024-01-10T09:00:00.000Z".into(),
                duration_minutes: Some(32.5),
                intensity: Some(Intensity::Moderate),
                total_sets: None,
                total_reps: None,
                weight: None,
                notes: Some("easy pace".into()),
                tags: Some(vec!["outdoor".into(), " ".into()]),
            }
            .with_id("11111111-1111-4111-8111-111111111111".into()),
            NewWorkout {
                title: "Squats".into(),
                performed_at: "invalid".into(),
                duration_minutes: None,
                intensity: None,
                total_sets: Some(5),
                total_reps: Some(25),
                weight: Some(102.5),
                notes: None,
                tags: None,
            }
            .with_id("22222222-2222-4222-8222-222222222222".into()),
        ]
    }

    fn temp_file(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("workout_log_{name}_{}_{nanos}", std::process::id()));
        path.push("pulse.workouts.json");
        path
    }

    #[test]
    fn persisted_value_holds_only_the_collection() {
        let bytes = encode_workouts(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["workouts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn decode_rejects_corrupt_values() {
        assert!(matches!(
            decode_workouts(b"{not json"),
            Err(StorageError::Corrupt(_))
        ));
        assert!(matches!(
            decode_workouts(br#"{"workouts": 3}"#),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn decode_keeps_good_records_next_to_bad_ones() {
        let raw = br#"{"workouts": [
            {"id": "a", "title": "Run", "performedAt": "2024-01-10T09:00:00Z", "totalReps": 20},
            {"id": "b", "title": "Bike", "performedAt": "2024-01-09T09:00:00Z", "intensity": "extreme"},
            {"title": "no id"},
            {"id": "c", "title": "Squats", "performedAt": 1704877200000, "totalReps": 2.5}
        ]}"#;
        let workouts = decode_workouts(raw).unwrap();
        let ids: Vec<&str> = workouts.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(workouts[0].total_reps, Some(20));
        assert_eq!(workouts[1].intensity, None);
        assert_eq!(workouts[2].total_reps, None);
        assert_eq!(workouts[2].performed_at_utc(), None);
    }

    #[tokio::test]
    async fn file_repository_round_trips() {
        let path = temp_file("roundtrip");
        let repo = JsonFileRepository::new(&path);
        assert!(repo.load().await.unwrap().is_none());

        repo.save(&sample()).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, sample());
        assert!(!repo.temp_path().exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn file_repository_reports_unreadable_slot() {
        let dir = temp_file("dir");
        std::fs::create_dir_all(&dir).unwrap();
        let repo = JsonFileRepository::new(&dir);
        assert!(matches!(repo.load().await, Err(StorageError::Unavailable(_))));
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[tokio::test]
    async fn memory_repository_round_trips() {
        let repo = MemoryRepository::new();
        assert!(repo.load().await.unwrap().is_none());
        repo.save(&sample()).await.unwrap();
        assert_eq!(repo.load().await.unwrap().unwrap(), sample());
    }

    #[tokio::test]
    async fn disabled_repository_always_fails() {
        let repo = DisabledRepository;
        assert!(matches!(repo.load().await, Err(StorageError::Disabled)));
        assert!(matches!(repo.save(&[]).await, Err(StorageError::Disabled)));
    }
}
