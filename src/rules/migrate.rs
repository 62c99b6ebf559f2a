use crate::config::types::MigrationSpec;
use crate::error::{QuizRulesError, Result};
use crate::store::Record;

/// A compiled `structureMigration` directive.
#[derive(Debug, Clone, Default)]
pub struct StructureMigration {
	/// (old, new) pairs in declaration order.
	rename: Vec<(String, String)>,
	drop: Vec<String>,
	add: Record,
}

impl StructureMigration {
	/// Compile the directive. Rename targets must be strings.
	pub fn compile(spec: &MigrationSpec) -> Result<Self> {
		let rename = spec
			.rename
			.iter()
			.map(|(old, new)| {
				new.as_str()
					.map(|new| (old.clone(), new.to_string()))
					.ok_or_else(|| QuizRulesError::InvalidRule {
						location: format!("structureMigration.rename.{old}"),
						detail: "expected a string field name".to_string(),
					})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(StructureMigration {
			rename,
			drop: spec.drop.clone(),
			add: spec.add.clone(),
		})
	}

	pub fn renames(&self) -> &[(String, String)] {
		&self.rename
	}

	pub fn drops(&self) -> &[String] {
		&self.drop
	}

	pub fn defaults(&self) -> &Record {
		&self.add
	}

	pub fn is_empty(&self) -> bool {
		self.rename.is_empty() && self.drop.is_empty() && self.add.is_empty()
	}

	/// Produce the migrated form of one record: rename, then drop, then add
	/// defaults for fields still absent.
	pub fn migrate(&self, mut record: Record) -> Record {
		for (old, new) in &self.rename {
			if old == new {
				continue;
			}
			if let Some(value) = record.shift_remove(old) {
				record.insert(new.clone(), value);
			}
		}

		for field in &self.drop {
			record.shift_remove(field);
		}

		for (field, default) in &self.add {
			if !record.contains_key(field) {
				record.insert(field.clone(), default.clone());
			}
		}

		record
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{Value, json};

	fn record(value: Value) -> Record {
		match value {
			Value::Object(map) => map,
			_ => panic!("fixture must be an object"),
		}
	}

	fn migration(value: Value) -> StructureMigration {
		let spec: MigrationSpec = serde_json::from_value(value).unwrap();
		StructureMigration::compile(&spec).unwrap()
	}

	#[test]
	fn test_rename_moves_value() {
		let m = migration(json!({"rename": {"old": "new"}}));
		let out = m.migrate(record(json!({"id": 1, "old": 5})));

		assert_eq!(out, record(json!({"id": 1, "new": 5})));
	}

	#[test]
	fn test_migration_is_idempotent() {
		let m = migration(json!({"rename": {"old": "new"}, "drop": ["x"], "add": {"v": 1}}));
		let once = m.migrate(record(json!({"old": 5, "x": true})));
		let twice = m.migrate(once.clone());

		assert_eq!(once, twice);
	}

	#[test]
	fn test_rename_absent_is_noop() {
		let m = migration(json!({"rename": {"old": "new"}}));
		let out = m.migrate(record(json!({"id": 1})));

		assert_eq!(out, record(json!({"id": 1})));
	}

	#[test]
	fn test_rename_overwrites_existing_in_place() {
		let m = migration(json!({"rename": {"old": "new"}}));
		let out = m.migrate(record(json!({"new": 1, "id": 2, "old": 3})));

		let keys: Vec<_> = out.keys().cloned().collect();
		assert_eq!(keys, vec!["new", "id"]);
		assert_eq!(out["new"], json!(3));
	}

	#[test]
	fn test_rename_to_self_is_noop() {
		let m = migration(json!({"rename": {"id": "id"}}));
		let out = m.migrate(record(json!({"id": 1, "tag": "x"})));

		assert_eq!(out, record(json!({"id": 1, "tag": "x"})));
	}

	#[test]
	fn test_rename_chain_follows_declaration_order() {
		let m = migration(json!({"rename": {"a": "b", "b": "c"}}));
		let out = m.migrate(record(json!({"a": 1})));
		assert_eq!(out, record(json!({"c": 1})));

		let m = migration(json!({"rename": {"b": "c", "a": "b"}}));
		let out = m.migrate(record(json!({"a": 1})));
		assert_eq!(out, record(json!({"b": 1})));
	}

	#[test]
	fn test_drop_removes_present_fields() {
		let m = migration(json!({"drop": ["legacy", "missing"]}));
		let out = m.migrate(record(json!({"id": 1, "legacy": true, "tag": "x"})));

		assert_eq!(out, record(json!({"id": 1, "tag": "x"})));
		let keys: Vec<_> = out.keys().cloned().collect();
		assert_eq!(keys, vec!["id", "tag"]);
	}

	#[test]
	fn test_add_only_when_absent() {
		let m = migration(json!({"add": {"version": 2, "tag": "default"}}));
		let out = m.migrate(record(json!({"id": 1, "tag": "x"})));

		assert_eq!(out, record(json!({"id": 1, "tag": "x", "version": 2})));
	}

	#[test]
	fn test_dropped_field_is_re_added_with_default() {
		let m = migration(json!({"drop": ["tag"], "add": {"tag": "default"}}));
		let out = m.migrate(record(json!({"id": 1, "tag": "x"})));

		assert_eq!(out, record(json!({"id": 1, "tag": "default"})));
	}

	#[test]
	fn test_non_string_rename_target_is_rejected() {
		let spec: MigrationSpec = serde_json::from_value(json!({"rename": {"old": 3}})).unwrap();
		match StructureMigration::compile(&spec).unwrap_err() {
			QuizRulesError::InvalidRule { location, .. } => {
				assert_eq!(location, "structureMigration.rename.old");
			}
			_ => panic!("Expected InvalidRule error"),
		}
	}
}
