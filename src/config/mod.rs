//! Configuration module for substack-dl
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then explicit overrides (usually from the command line). The result is
//! validated once and handed to the orchestrator by reference.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use substack_dl::config::{load_config, ConfigOverrides};
//!
//! let config = load_config(Some(Path::new("config.toml")), &ConfigOverrides::default()).unwrap();
//! println!("Posts will be written to: {}", config.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigOverrides, DEFAULT_CONFIG_FILE};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_file, load_config_with_hash, parse_config};
pub use validation::validate;
