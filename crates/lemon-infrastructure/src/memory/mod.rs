//! Process-local storage backend

pub mod store;

pub use store::{memory_repositories, InMemoryStore};
