//! File access within an application's config directory
//!
//! This module handles all file I/O:
//! - Resolving paths for an application name
//! - Creating the config directory before writes
//! - Reading and writing files through the format registry
//! - Listing and deleting entries

mod config_store;
pub mod directory;
mod options;

pub use config_store::ConfigStore;
pub use options::{DEFAULT_FILE, GetOptions, SaveOptions};
