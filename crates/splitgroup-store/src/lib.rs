//! splitgroup-store — Tag store backends.
//!
//! Implements the `TagStore` trait for in-memory and JSON-file storage, and
//! loads the `splitgroup.toml` tool configuration that selects between them.

pub mod config;
pub mod file;
pub mod memory;

pub use config::{create_store, load_config, load_config_from, SplitgroupConfig, StoreConfig};
pub use file::JsonFileTagStore;
pub use memory::MemoryTagStore;
