//! Infrastructure layer for the filesystem and the address bar.

pub mod location;
pub mod paths;

pub use location::{Location, MemoryLocation};
pub use paths::{default_storage_path, expand_tilde, get_data_dir};
