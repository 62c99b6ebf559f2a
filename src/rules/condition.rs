use crate::error::{QuizRulesError, Result};
use crate::store::Record;
use regex::Regex;
use serde_json::{Number, Value};

/// Key suffix selecting a substring test.
pub const CONTAINS_SUFFIX: &str = "_contains";

/// Key suffix selecting a regex search.
pub const REGEX_SUFFIX: &str = "_regex";

/// One test against one field of a record.
#[derive(Debug, Clone)]
pub enum Predicate {
	/// `record[field] == value`. An absent field equals `null`.
	Equals { field: String, value: Value },

	/// `needle` occurs in the field's text.
	Contains { field: String, needle: String },

	/// `pattern` finds a match somewhere in the field's text.
	Matches { field: String, pattern: Regex },
}

impl Predicate {
	/// Parse one `where` entry, sniffing the key suffix once.
	pub fn parse(key: &str, value: &Value) -> Result<Self> {
		if let Some(field) = key.strip_suffix(CONTAINS_SUFFIX) {
			let needle = expect_str(key, value)?;
			return Ok(Predicate::Contains {
				field: field.to_string(),
				needle: needle.to_string(),
			});
		}

		if let Some(field) = key.strip_suffix(REGEX_SUFFIX) {
			let pattern = compile_regex(expect_str(key, value)?)?;
			return Ok(Predicate::Matches {
				field: field.to_string(),
				pattern,
			});
		}

		Ok(Predicate::Equals {
			field: key.to_string(),
			value: value.clone(),
		})
	}

	/// Check this predicate against a record.
	pub fn matches(&self, record: &Record) -> bool {
		match self {
			Predicate::Equals { field, value } => {
				json_equal(record.get(field).unwrap_or(&Value::Null), value)
			}
			Predicate::Contains { field, needle } => text_field(record, field).contains(needle.as_str()),
			Predicate::Matches { field, pattern } => pattern.is_match(text_field(record, field)),
		}
	}
}

/// A conjunction of predicates compiled from a `where` mapping.
#[derive(Debug, Clone, Default)]
pub struct Condition {
	predicates: Vec<Predicate>,
}

impl Condition {
	/// Compile a raw `where` mapping. Patterns are compiled here, once.
	pub fn compile(raw: &Record) -> Result<Self> {
		let predicates = raw
			.iter()
			.map(|(key, value)| Predicate::parse(key, value))
			.collect::<Result<Vec<_>>>()?;

		Ok(Condition { predicates })
	}

	/// True iff every predicate holds. An empty condition matches everything.
	pub fn matches(&self, record: &Record) -> bool {
		self.predicates.iter().all(|p| p.matches(record))
	}

	pub fn predicates(&self) -> &[Predicate] {
		&self.predicates
	}

	pub fn is_empty(&self) -> bool {
		self.predicates.is_empty()
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| QuizRulesError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
	value.as_str().ok_or_else(|| QuizRulesError::InvalidRule {
		location: format!("where.{key}"),
		detail: "expected a string value".to_string(),
	})
}

/// The field's text, or `""` when absent or not a string.
fn text_field<'a>(record: &'a Record, field: &str) -> &'a str {
	record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Type-sensitive equality. Numbers compare by value, so `1 == 1.0`,
/// but `"1" != 1` and `true != 1`.
pub fn json_equal(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
		(Value::Array(a), Value::Array(b)) => {
			a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y))
		}
		(Value::Object(a), Value::Object(b)) => {
			a.len() == b.len()
				&& a.iter()
					.all(|(k, x)| b.get(k).is_some_and(|y| json_equal(x, y)))
		}
		(a, b) => a == b,
	}
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
	if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
		return x == y;
	}
	if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
		return x == y;
	}
	match (a.as_f64(), b.as_f64()) {
		(Some(x), Some(y)) => x == y,
		_ => false,
	}
}
