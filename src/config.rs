use crate::errors::ConfigError;
use crate::storage::{DisabledRepository, JsonFileRepository, MemoryRepository, StorageBackend};
use std::{env, net::SocketAddr, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/pulse.workouts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    File,
    Memory,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub storage: StorageKind,
}

impl Config {
    /// Reads `PORT`, `APP_DATA_PATH` and `APP_STORAGE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let storage = match lookup("APP_STORAGE") {
            None => StorageKind::File,
            Some(value) => {
                let normalized = value.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "" | "file" => StorageKind::File,
                    "memory" => StorageKind::Memory,
                    "disabled" | "none" => StorageKind::Disabled,
                    _ => return Err(ConfigError::InvalidStorage(value)),
                }
            }
        };

        Ok(Self {
            port,
            data_path,
            storage,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn storage_backend(&self) -> StorageBackend {
        match self.storage {
            StorageKind::File => StorageBackend::File(JsonFileRepository::new(&self.data_path)),
            StorageKind::Memory => StorageBackend::Memory(MemoryRepository::new()),
            StorageKind::Disabled => StorageBackend::Disabled(DisabledRepository),
        }
    }
}
