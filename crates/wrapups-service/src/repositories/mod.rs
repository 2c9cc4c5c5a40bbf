//! Repository layer for the wrapups service.

pub mod wrapups;

pub use wrapups::{InMemoryWrapupStore, WrapupStore};
