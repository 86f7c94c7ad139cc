//! # Lemon Core
//!
//! Domain entities, access policy, services, and repository traits for the ordering API.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
