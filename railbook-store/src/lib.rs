pub mod admin;
pub mod app_config;
pub mod auth;
pub mod database;
pub mod engine;
pub mod error;
pub mod stats;

pub use admin::AdminMaintenance;
pub use auth::AuthService;
pub use database::DbClient;
pub use engine::ReservationEngine;
pub use error::EngineError;
pub use stats::StatsReporter;
