//! Configuration module
//!
//! This module handles loading, parsing, and validating crawl configuration,
//! either assembled from CLI flags or loaded from a TOML file:
//!
//! ```toml
//! seeds = ["https://bitcointalk.org/"]
//! keyword = "bitcoins"
//! max-depth = 2
//! delay-ms = 500
//! sentiment = true
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, TraversalOrder};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation
pub use validation::validate;
