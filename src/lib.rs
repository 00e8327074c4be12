//! App Config
//!
//! Locates the per-user configuration directory for an application and reads,
//! writes, lists and deletes files inside it through a fixed set of formats
//! (JSON, YAML, INI, raw text, lines, binary).

pub mod cli;
pub mod format;
pub mod paths;
pub mod store;

// Re-exports for convenience
pub use format::{Codec, Contents, Format};
pub use paths::{Environment, Platform, get_dir_for, get_file_for};
pub use store::{ConfigStore, DEFAULT_FILE, GetOptions, SaveOptions};
