//! Configuration loading and parsing for quiz-rules.
//!
//! This module handles:
//! - Rules file parsing (JSON or TOML)
//! - Project settings discovery (`.quiz-rules.toml`)
//! - The starter rules template

pub mod parser;
pub mod settings;
pub mod template;
pub mod types;

pub use parser::{RulesFormat, parse_rules_file, parse_rules_str, parse_settings_file};
pub use settings::{
	PathOverrides, ResolvedPaths, SETTINGS_FILE_NAME, discover_settings, load_settings,
	resolve_paths,
};
pub use template::generate_rules_template;
pub use types::{ActionSpec, LoadedSettings, MigrationSpec, ReplacementSpec, RuleFile, Settings};
