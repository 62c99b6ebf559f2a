//! quiz-rules - apply declarative rule sets to quiz-question collections.
//!
//! This library provides the core functionality for quiz-rules, including:
//! - Rules file parsing (JSON or TOML) and project settings discovery
//! - Compiling rules into typed actions with pre-compiled patterns
//! - The four-phase rule engine (delete, edit, add, migrate)
//! - Loading and saving record collections
//!
//! # Example
//!
//! ```no_run
//! use quiz_rules::config::parse_rules_file;
//! use quiz_rules::rules::compile_rules;
//! use quiz_rules::store::{load_records, save_records};
//! use std::path::Path;
//!
//! let file = parse_rules_file(Path::new("rules.json")).unwrap();
//! let rules = compile_rules(&file, false).unwrap();
//! let records = load_records(Path::new("data/questions.source.json")).unwrap();
//!
//! let outcome = quiz_rules::engine::run(records, &rules);
//! save_records(Path::new("data/questions.json"), &outcome.records).unwrap();
//! println!("Wrote {} records", outcome.report.output);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod store;

pub use engine::{RunOutcome, RunReport, run};
pub use error::{QuizRulesError, Result};
pub use rules::{Action, RuleSet, compile_rules};
pub use store::Record;
