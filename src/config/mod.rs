//! Configuration module for Tabelog-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use tabelog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Detail retries: {}", config.crawler.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
