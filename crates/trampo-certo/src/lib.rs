//! Trampo Certo: a job marketplace connecting university students with flexible,
//! accessible internships and research grants.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;

pub use error::AppError;
