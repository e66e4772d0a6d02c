// Library root - exports for the server binary, tools and tests

pub mod app_state;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;

pub use app_state::AppState;
pub use config::Config;
pub use error::{ApiError, Result};
pub use routes::router;
