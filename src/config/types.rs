use crate::store::Record;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// Top-level contents of a rules file (`rules.json` or `rules.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFile {
	/// Actions in declaration order, kept raw until their `type` is known.
	/// Each phase re-scans the whole list.
	#[serde(default)]
	pub actions: Vec<Value>,

	/// Optional post-pass applied to every record after all actions.
	#[serde(default)]
	pub structure_migration: Option<MigrationSpec>,
}

/// Payload of a known action kind, decoded once its `type` is recognized.
///
/// Entries with an unknown or non-string `type` are never decoded, so their
/// other keys may have any shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionSpec {
	/// Condition scoping the action. Missing means "every record".
	#[serde(rename = "where", default)]
	pub condition: Record,

	/// Fields targeted by `text_replace`. Defaults to questionText and explanation.
	#[serde(default)]
	pub target: Option<Vec<String>>,

	/// Ordered replacements for `text_replace`.
	#[serde(default)]
	pub replacements: Vec<ReplacementSpec>,

	/// Field assignments for `set_fields`.
	#[serde(default)]
	pub fields: Record,

	/// Records appended by `add`.
	#[serde(default, alias = "records")]
	pub questions: Vec<Record>,
}

impl ActionSpec {
	/// The `type` of a raw action entry, if it is a string.
	pub fn kind_of(raw: &Value) -> Option<&str> {
		raw.get("type").and_then(Value::as_str)
	}

	/// Decode the payload of a raw action entry.
	pub fn decode(raw: &Value) -> serde_json::Result<Self> {
		ActionSpec::deserialize(raw)
	}
}

/// A single replacement inside a `text_replace` action.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementSpec {
	pub from: String,

	pub to: String,

	/// Treat `from` as a regex and `to` as a substitution template.
	#[serde(default)]
	pub regex: bool,
}

/// The `structureMigration` directive as written in the rules file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MigrationSpec {
	/// old name -> new name, applied in declaration order.
	#[serde(default)]
	pub rename: Record,

	#[serde(default)]
	pub drop: Vec<String>,

	/// field -> default value, only applied when the field is absent.
	#[serde(default)]
	pub add: Record,
}

/// Project settings from a `.quiz-rules.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
	/// Input records file.
	#[serde(default)]
	pub source: Option<PathBuf>,

	/// Output records file.
	#[serde(default)]
	pub output: Option<PathBuf>,

	/// Rules file (JSON, or TOML by extension).
	#[serde(default)]
	pub rules: Option<PathBuf>,

	/// Reject unknown action types and targets instead of skipping them.
	#[serde(default)]
	pub strict: bool,
}

/// Settings with the path they were loaded from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
	/// The parsed settings.
	pub settings: Settings,

	/// The path these settings were loaded from.
	pub path: PathBuf,
}
