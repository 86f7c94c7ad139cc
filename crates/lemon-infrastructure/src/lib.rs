//! # Lemon Infrastructure
//!
//! Storage adapters for the repository ports: PostgreSQL and in-memory.

pub mod database;
pub mod memory;

pub use database::{create_pool, postgres_repositories, run_migrations};
pub use memory::{memory_repositories, InMemoryStore};
