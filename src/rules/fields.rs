use crate::store::Record;

/// A compiled `set_fields` action body.
#[derive(Debug, Clone, Default)]
pub struct SetFields {
	fields: Record,
}

impl SetFields {
	pub fn new(fields: Record) -> Self {
		SetFields { fields }
	}

	pub fn fields(&self) -> &Record {
		&self.fields
	}

	/// Assign every field, overwriting existing values.
	///
	/// An existing key keeps its position; a new key is appended.
	pub fn apply(&self, record: &mut Record) {
		for (field, value) in &self.fields {
			record.insert(field.clone(), value.clone());
		}
	}
}
