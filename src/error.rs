use std::path::PathBuf;

/// Library-level structured errors for quiz-rules.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum QuizRulesError {
	#[error("Failed to read records file: {path}")]
	RecordsReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse records file: {path}")]
	RecordsParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("ShapeError in {origin}: {detail}")]
	ShapeError { origin: String, detail: String },

	#[error("Failed to serialize records")]
	RecordsSerializeError {
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to write records file: {path}")]
	RecordsWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read rules file: {path}")]
	RulesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rules file: {path}")]
	RulesParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to parse rules file: {path}")]
	RulesTomlParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid rule at {location}: {detail}")]
	InvalidRule { location: String, detail: String },

	#[error("Invalid {kind} action at actions[{index}]")]
	InvalidAction {
		index: usize,
		kind: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("Unknown action type at actions[{index}]: {kind}")]
	UnknownActionType { index: usize, kind: String },

	#[error("Unknown text_replace target at actions[{index}]: {target}")]
	UnknownTarget { index: usize, target: String },

	#[error("Failed to read settings file: {path}")]
	SettingsReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	SettingsParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Result type alias using QuizRulesError.
pub type Result<T> = std::result::Result<T, QuizRulesError>;
