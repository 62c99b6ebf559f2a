//! Loading and saving record collections.
//!
//! This module handles:
//! - Reading a JSON array of records and checking its shape
//! - Rendering and writing the final collection

use crate::error::{QuizRulesError, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// One quiz question: an open mapping of field name to JSON value.
///
/// Key insertion order is preserved so output is stable across runs.
pub type Record = serde_json::Map<String, Value>;

/// Read a records file. The document must be a JSON array of objects.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
	let content =
		std::fs::read_to_string(path).map_err(|source| QuizRulesError::RecordsReadError {
			path: path.to_path_buf(),
			source,
		})?;

	let value: Value =
		serde_json::from_str(&content).map_err(|source| QuizRulesError::RecordsParseError {
			path: path.to_path_buf(),
			source,
		})?;

	let records = records_from_value(value, &path.display().to_string())?;
	debug!(path = %path.display(), count = records.len(), "loaded records");
	Ok(records)
}

/// Check that a parsed document is a sequence of records.
///
/// `origin` names the document in the `ShapeError` message.
pub fn records_from_value(value: Value, origin: &str) -> Result<Vec<Record>> {
	let items = match value {
		Value::Array(items) => items,
		other => {
			return Err(QuizRulesError::ShapeError {
				origin: origin.to_string(),
				detail: format!("expected a JSON array, found {}", type_name(&other)),
			});
		}
	};

	items
		.into_iter()
		.enumerate()
		.map(|(index, item)| match item {
			Value::Object(record) => Ok(record),
			other => Err(QuizRulesError::ShapeError {
				origin: origin.to_string(),
				detail: format!("element {index} is {}, expected an object", type_name(&other)),
			}),
		})
		.collect()
}

/// Render records as pretty JSON with a trailing newline.
pub fn render_records(records: &[Record]) -> Result<String> {
	let mut rendered = serde_json::to_string_pretty(records)
		.map_err(|source| QuizRulesError::RecordsSerializeError { source })?;
	rendered.push('\n');
	Ok(rendered)
}

/// Write records to `path`, replacing its content.
///
/// The document is rendered before the file is touched, so a serialization
/// failure leaves the previous file intact.
pub fn save_records(path: &Path, records: &[Record]) -> Result<()> {
	let rendered = render_records(records)?;
	std::fs::write(path, rendered).map_err(|source| QuizRulesError::RecordsWriteError {
		path: path.to_path_buf(),
		source,
	})?;
	debug!(path = %path.display(), count = records.len(), "saved records");
	Ok(())
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
