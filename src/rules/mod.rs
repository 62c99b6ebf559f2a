//! Rule compilation and the record-level operations.
//!
//! This module handles:
//! - Condition matching (equality, substring and regex tests)
//! - Text replacement over question text, explanation and choices
//! - Field assignment and structure migration
//! - Compiling a parsed rules file into a typed rule set

pub mod compile;
pub mod condition;
pub mod fields;
pub mod migrate;
pub mod rewriter;

pub use compile::{Action, RuleSet, compile_rules};
pub use condition::{Condition, Predicate};
pub use fields::SetFields;
pub use migrate::StructureMigration;
pub use rewriter::{Replacement, Target, TextReplace};
