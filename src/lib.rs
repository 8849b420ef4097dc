pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod runner;
pub mod simulation;

pub use dashboard::Dashboard;
pub use db::RecordStore;
pub use error::{GarudaError, Result};
pub use simulation::{RandomSource, RngSource, SeverityModel, SimulationStep};
