//! Storage layer for persisted filter preferences.
//!
//! # Modules
//!
//! - `backend`: [`PreferenceStorage`] trait implemented by every backend
//! - `json`: JSON file backend with atomic writes
//! - `memory`: in-process backend
//! - `models`: the persisted subset of the filter state

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::PreferenceStorage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::PersistedFilters;
