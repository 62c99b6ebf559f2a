use crate::config::types::{ActionSpec, RuleFile};
use crate::error::{QuizRulesError, Result};
use crate::rules::condition::Condition;
use crate::rules::fields::SetFields;
use crate::rules::migrate::StructureMigration;
use crate::rules::rewriter::{Replacement, Target, TextReplace};
use crate::store::Record;
use serde_json::Value;
use tracing::{debug, warn};

/// A compiled action. Dispatch is by exhaustive `match`, never by name.
#[derive(Debug, Clone)]
pub enum Action {
	/// Remove matching records.
	Delete { condition: Condition },

	/// Rewrite text fields of matching records.
	TextReplace {
		condition: Condition,
		edit: TextReplace,
	},

	/// Assign literal values on matching records.
	SetFields { condition: Condition, set: SetFields },

	/// Append records verbatim after the edit phase.
	Add { records: Vec<Record> },
}

impl Action {
	/// Rules-file name of this action kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Action::Delete { .. } => "delete",
			Action::TextReplace { .. } => "text_replace",
			Action::SetFields { .. } => "set_fields",
			Action::Add { .. } => "add",
		}
	}

	/// The scoping condition. `Add` has none.
	pub fn condition(&self) -> Option<&Condition> {
		match self {
			Action::Delete { condition }
			| Action::TextReplace { condition, .. }
			| Action::SetFields { condition, .. } => Some(condition),
			Action::Add { .. } => None,
		}
	}
}

/// A compiled rule set. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	/// Actions in declaration order, malformed ones already removed.
	pub actions: Vec<Action>,

	/// Post-pass applied to every record.
	pub migration: Option<StructureMigration>,
}

/// Compile a parsed rules file.
///
/// With `strict == false`, actions with a missing, non-string or unknown
/// `type` and unknown `text_replace` targets are skipped with a warning.
/// With `strict == true` they are errors. Invalid patterns and malformed
/// payloads of known action kinds are always errors.
pub fn compile_rules(file: &RuleFile, strict: bool) -> Result<RuleSet> {
	let mut actions = Vec::with_capacity(file.actions.len());

	for (index, raw) in file.actions.iter().enumerate() {
		if let Some(action) = compile_action(index, raw, strict)? {
			debug!(index, kind = action.kind(), "compiled action");
			actions.push(action);
		}
	}

	let migration = file
		.structure_migration
		.as_ref()
		.map(StructureMigration::compile)
		.transpose()?;

	Ok(RuleSet { actions, migration })
}

fn compile_action(index: usize, raw: &Value, strict: bool) -> Result<Option<Action>> {
	let kind = match ActionSpec::kind_of(raw) {
		Some(kind @ ("delete" | "text_replace" | "set_fields" | "add")) => kind,
		_ => {
			let kind = match raw.get("type") {
				Some(Value::String(kind)) => kind.clone(),
				Some(other) => other.to_string(),
				None => "<missing>".to_string(),
			};
			if strict {
				return Err(QuizRulesError::UnknownActionType { index, kind });
			}
			warn!(index, kind = %kind, "ignoring action with unknown type");
			return Ok(None);
		}
	};

	let spec = ActionSpec::decode(raw).map_err(|source| QuizRulesError::InvalidAction {
		index,
		kind: kind.to_string(),
		source,
	})?;

	let action = match kind {
		"delete" => Action::Delete {
			condition: Condition::compile(&spec.condition)?,
		},
		"text_replace" => Action::TextReplace {
			condition: Condition::compile(&spec.condition)?,
			edit: compile_text_replace(index, &spec, strict)?,
		},
		"set_fields" => Action::SetFields {
			condition: Condition::compile(&spec.condition)?,
			set: SetFields::new(spec.fields),
		},
		_ => Action::Add {
			records: spec.questions,
		},
	};

	Ok(Some(action))
}

fn compile_text_replace(index: usize, spec: &ActionSpec, strict: bool) -> Result<TextReplace> {
	let targets = match &spec.target {
		None => Target::DEFAULT.to_vec(),
		Some(names) => {
			let mut targets = Vec::with_capacity(names.len());
			for name in names {
				match Target::parse(name) {
					Some(target) => targets.push(target),
					None if strict => {
						return Err(QuizRulesError::UnknownTarget {
							index,
							target: name.clone(),
						});
					}
					None => warn!(index, target = %name, "ignoring unknown text_replace target"),
				}
			}
			targets
		}
	};

	let replacements = spec
		.replacements
		.iter()
		.map(Replacement::compile)
		.collect::<Result<Vec<_>>>()?;

	Ok(TextReplace::new(targets, replacements))
}
