//! The rule engine.
//!
//! A run is four phases over the whole action list, always in this order:
//! delete, edit (`text_replace` and `set_fields`), add, migrate. Each phase
//! takes ownership of the collection produced by the previous one.

use crate::rules::{Action, RuleSet, StructureMigration};
use crate::store::Record;
use tracing::{debug, info};

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
	/// Records handed to the engine.
	pub input: usize,

	/// Records removed by the delete phase.
	pub deleted: usize,

	/// Action applications in the edit phase, one per (action, record) match.
	pub edits: usize,

	/// Records appended by the add phase.
	pub added: usize,

	/// Records rewritten by the migration phase.
	pub migrated: usize,

	/// Records in the final collection.
	pub output: usize,
}

/// Result of a run: the final collection and its report.
#[derive(Debug, Clone)]
pub struct RunOutcome {
	pub records: Vec<Record>,
	pub report: RunReport,
}

/// Apply a rule set to a collection.
///
/// Output order is surviving input records (in input order) followed by
/// added records (action order, then list order).
pub fn run(records: Vec<Record>, rules: &RuleSet) -> RunOutcome {
	let mut report = RunReport {
		input: records.len(),
		..Default::default()
	};

	let records = delete_phase(records, &rules.actions, &mut report);
	let records = edit_phase(records, &rules.actions, &mut report);
	let records = add_phase(records, &rules.actions, &mut report);
	let records = migrate_phase(records, rules.migration.as_ref(), &mut report);

	report.output = records.len();
	info!(
		input = report.input,
		deleted = report.deleted,
		edits = report.edits,
		added = report.added,
		migrated = report.migrated,
		output = report.output,
		"rules applied"
	);

	RunOutcome { records, report }
}

/// Remove matching records. Each delete only sees the survivors of the
/// deletes before it.
fn delete_phase(mut records: Vec<Record>, actions: &[Action], report: &mut RunReport) -> Vec<Record> {
	for (index, action) in actions.iter().enumerate() {
		let Action::Delete { condition } = action else {
			continue;
		};

		let before = records.len();
		records.retain(|record| !condition.matches(record));
		let removed = before - records.len();

		debug!(index, removed, "delete");
		report.deleted += removed;
	}

	records
}

/// Apply edits in declaration order. A condition is evaluated against the
/// record as left by the edits before it.
fn edit_phase(mut records: Vec<Record>, actions: &[Action], report: &mut RunReport) -> Vec<Record> {
	for (index, action) in actions.iter().enumerate() {
		let mut applied = 0;

		match action {
			Action::TextReplace { condition, edit } => {
				for record in records.iter_mut().filter(|r| condition.matches(r)) {
					edit.apply(record);
					applied += 1;
				}
			}
			Action::SetFields { condition, set } => {
				for record in records.iter_mut().filter(|r| condition.matches(r)) {
					set.apply(record);
					applied += 1;
				}
			}
			Action::Delete { .. } | Action::Add { .. } => continue,
		}

		debug!(index, kind = action.kind(), applied, "edit");
		report.edits += applied;
	}

	records
}

/// Append records from every `add` action.
fn add_phase(mut records: Vec<Record>, actions: &[Action], report: &mut RunReport) -> Vec<Record> {
	for (index, action) in actions.iter().enumerate() {
		let Action::Add { records: added } = action else {
			continue;
		};

		debug!(index, count = added.len(), "add");
		records.extend(added.iter().cloned());
		report.added += added.len();
	}

	records
}

fn migrate_phase(
	records: Vec<Record>,
	migration: Option<&StructureMigration>,
	report: &mut RunReport,
) -> Vec<Record> {
	let Some(migration) = migration else {
		return records;
	};

	let migrated: Vec<Record> = records
		.into_iter()
		.map(|record| migration.migrate(record))
		.collect();

	debug!(count = migrated.len(), "migrate");
	report.migrated = migrated.len();
	migrated
}
