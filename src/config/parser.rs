use crate::config::types::{RuleFile, Settings};
use crate::error::{QuizRulesError, Result};
use std::path::Path;

/// Serialization format of a rules file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
	Json,
	Toml,
}

impl RulesFormat {
	/// `.toml` files are TOML; everything else is read as JSON.
	pub fn from_path(path: &Path) -> Self {
		if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("toml")) {
			RulesFormat::Toml
		} else {
			RulesFormat::Json
		}
	}
}

/// Parse a rules file from the given path.
pub fn parse_rules_file(path: &Path) -> Result<RuleFile> {
	let content = std::fs::read_to_string(path).map_err(|source| QuizRulesError::RulesReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_rules_str(&content, path)
}

/// Parse rules from a string (useful for testing). The path picks the format
/// and is used in error messages.
pub fn parse_rules_str(content: &str, path: &Path) -> Result<RuleFile> {
	match RulesFormat::from_path(path) {
		RulesFormat::Json => {
			serde_json::from_str(content).map_err(|source| QuizRulesError::RulesParseError {
				path: path.to_path_buf(),
				source,
			})
		}
		RulesFormat::Toml => {
			toml::from_str(content).map_err(|source| QuizRulesError::RulesTomlParseError {
				path: path.to_path_buf(),
				source,
			})
		}
	}
}

/// Parse a `.quiz-rules.toml` settings file.
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
	let content =
		std::fs::read_to_string(path).map_err(|source| QuizRulesError::SettingsReadError {
			path: path.to_path_buf(),
			source,
		})?;

	toml::from_str(&content).map_err(|source| QuizRulesError::SettingsParseError {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::ActionSpec;
	use serde_json::json;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_rules() {
		let path = PathBuf::from("rules.json");
		let rules = parse_rules_str("{}", &path).unwrap();

		assert!(rules.actions.is_empty());
		assert!(rules.structure_migration.is_none());
	}

	#[test]
	fn test_parse_json_actions() {
		let content = r#"
{
  "actions": [
    { "type": "delete", "where": { "tag": "drop" } },
    {
      "type": "text_replace",
      "target": ["choices"],
      "where": { "questionText_contains": "colour" },
      "replacements": [
        { "from": "colour", "to": "color" },
        { "from": "(\\d+)", "to": "<\\1>", "regex": true }
      ]
    },
    { "type": "set_fields", "fields": { "difficulty": "easy" } },
    { "type": "add", "questions": [ { "id": 99 } ] }
  ],
  "structureMigration": { "rename": { "tag": "category" }, "drop": ["legacy"], "add": { "version": 2 } }
}
"#;
		let path = PathBuf::from("rules.json");
		let rules = parse_rules_str(content, &path).unwrap();

		assert_eq!(rules.actions.len(), 4);
		assert_eq!(ActionSpec::kind_of(&rules.actions[0]), Some("delete"));
		let actions: Vec<ActionSpec> =
			rules.actions.iter().map(|a| ActionSpec::decode(a).unwrap()).collect();
		assert_eq!(actions[0].condition.get("tag"), Some(&json!("drop")));

		let replace = &actions[1];
		assert_eq!(replace.target, Some(vec!["choices".to_string()]));
		assert_eq!(replace.replacements.len(), 2);
		assert!(!replace.replacements[0].regex);
		assert!(replace.replacements[1].regex);
		assert_eq!(replace.replacements[1].to, r"<\1>");

		assert!(actions[2].condition.is_empty());
		assert_eq!(actions[3].questions.len(), 1);

		let migration = rules.structure_migration.unwrap();
		assert_eq!(migration.rename.get("tag"), Some(&json!("category")));
		assert_eq!(migration.drop, vec!["legacy".to_string()]);
		assert_eq!(migration.add.get("version"), Some(&json!(2)));
	}

	#[test]
	fn test_parse_add_records_alias() {
		let content = r#"{ "actions": [ { "type": "add", "records": [ { "id": 1 }, { "id": 2 } ] } ] }"#;
		let path = PathBuf::from("rules.json");
		let rules = parse_rules_str(content, &path).unwrap();

		let add = ActionSpec::decode(&rules.actions[0]).unwrap();
		assert_eq!(add.questions.len(), 2);
	}

	#[test]
	fn test_parse_action_without_type() {
		let content = r#"{ "actions": [ { "where": { "id": 1 } } ] }"#;
		let path = PathBuf::from("rules.json");
		let rules = parse_rules_str(content, &path).unwrap();

		assert!(ActionSpec::kind_of(&rules.actions[0]).is_none());
	}

	#[test]
	fn test_parse_unknown_action_with_any_shape() {
		let content = r#"{ "actions": [ { "type": "note", "target": "questionText" }, { "type": 7 } ] }"#;
		let path = PathBuf::from("rules.json");
		let rules = parse_rules_str(content, &path).unwrap();

		assert_eq!(rules.actions.len(), 2);
		assert_eq!(ActionSpec::kind_of(&rules.actions[0]), Some("note"));
		assert!(ActionSpec::kind_of(&rules.actions[1]).is_none());
	}

	#[test]
	fn test_parse_toml_rules() {
		let content = r#"
[[actions]]
type = "delete"
where = { tag = "drop" }

[[actions]]
type = "set_fields"
where = { tag = "math" }
fields = { difficulty = "easy" }

[structureMigration]
drop = ["legacy"]
"#;
		let path = PathBuf::from("rules.toml");
		let rules = parse_rules_str(content, &path).unwrap();

		assert_eq!(rules.actions.len(), 2);
		let set = ActionSpec::decode(&rules.actions[1]).unwrap();
		assert_eq!(set.fields.get("difficulty"), Some(&json!("easy")));
		assert_eq!(rules.structure_migration.unwrap().drop, vec!["legacy"]);
	}

	#[test]
	fn test_parse_toml_keeps_declaration_order() {
		let content = r#"
[[actions]]
type = "set_fields"
fields = { zeta = 1, alpha = 2 }

[structureMigration.rename]
b = "c"
a = "b"
"#;
		let path = PathBuf::from("rules.toml");
		let rules = parse_rules_str(content, &path).unwrap();

		let set = ActionSpec::decode(&rules.actions[0]).unwrap();
		let keys: Vec<_> = set.fields.keys().cloned().collect();
		assert_eq!(keys, vec!["zeta", "alpha"]);

		let rename: Vec<_> = rules.structure_migration.unwrap().rename.keys().cloned().collect();
		assert_eq!(rename, vec!["b", "a"]);
	}

	#[test]
	fn test_parse_invalid_json() {
		let path = PathBuf::from("rules.json");
		let result = parse_rules_str("{ not json", &path);

		match result.unwrap_err() {
			QuizRulesError::RulesParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("rules.json"));
			}
			other => panic!("Expected RulesParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_invalid_toml() {
		let path = PathBuf::from("rules.toml");
		let result = parse_rules_str("invalid toml [[[", &path);

		assert!(matches!(
			result,
			Err(QuizRulesError::RulesTomlParseError { .. })
		));
	}

	#[test]
	fn test_rules_format_from_path() {
		assert_eq!(RulesFormat::from_path(Path::new("rules.json")), RulesFormat::Json);
		assert_eq!(RulesFormat::from_path(Path::new("rules.TOML")), RulesFormat::Toml);
		assert_eq!(RulesFormat::from_path(Path::new("rules")), RulesFormat::Json);
	}
}
