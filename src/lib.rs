pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod id;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod validation;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use store::{StoreStatus, WorkoutStore};
