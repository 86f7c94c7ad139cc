//! # Lemon Shared
//!
//! Configuration, telemetry, and small shared types for the Little Lemon workspace.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
