pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::App;
pub use auth::AuthGate;
pub use config::{Config, Mode};
pub use errors::{AppError, Result};
pub use remote::RemoteClient;
pub use state::{AppState, Phase, Screen};
pub use storage::{KeyValueStore, LocalStore};
