use crate::config::types::ReplacementSpec;
use crate::error::Result;
use crate::rules::condition::compile_regex;
use crate::store::Record;
use regex::Regex;
use serde_json::Value;

/// A record field that `text_replace` may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	QuestionText,
	Explanation,
	Choices,
}

impl Target {
	/// Targets used when an action has no `target` list.
	pub const DEFAULT: [Target; 2] = [Target::QuestionText, Target::Explanation];

	/// Parse a target name as written in the rules file.
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"questionText" => Some(Target::QuestionText),
			"explanation" => Some(Target::Explanation),
			"choices" => Some(Target::Choices),
			_ => None,
		}
	}

	/// The record field this target rewrites.
	pub fn field_name(&self) -> &'static str {
		match self {
			Target::QuestionText => "questionText",
			Target::Explanation => "explanation",
			Target::Choices => "choices",
		}
	}
}

/// One compiled replacement step.
#[derive(Debug, Clone)]
pub enum Replacement {
	/// Replace every non-overlapping occurrence of `from`.
	Literal { from: String, to: String },

	/// Replace every match of `pattern`, expanding `template`.
	Pattern { pattern: Regex, template: String },
}

impl Replacement {
	/// Compile a replacement from the rules file.
	pub fn compile(spec: &ReplacementSpec) -> Result<Self> {
		if spec.regex {
			Ok(Replacement::Pattern {
				pattern: compile_regex(&spec.from)?,
				template: backref_template(&spec.to),
			})
		} else {
			Ok(Replacement::Literal {
				from: spec.from.clone(),
				to: spec.to.clone(),
			})
		}
	}

	/// Apply this replacement to a string.
	pub fn apply(&self, input: &str) -> String {
		match self {
			Replacement::Literal { from, to } => input.replace(from.as_str(), to),
			Replacement::Pattern { pattern, template } => {
				pattern.replace_all(input, template.as_str()).into_owned()
			}
		}
	}
}

/// A compiled `text_replace` action body.
#[derive(Debug, Clone)]
pub struct TextReplace {
	targets: Vec<Target>,
	replacements: Vec<Replacement>,
}

impl TextReplace {
	pub fn new(mut targets: Vec<Target>, replacements: Vec<Replacement>) -> Self {
		let mut seen = Vec::with_capacity(targets.len());
		targets.retain(|t| {
			if seen.contains(t) {
				false
			} else {
				seen.push(*t);
				true
			}
		});
		TextReplace {
			targets,
			replacements,
		}
	}

	pub fn targets(&self) -> &[Target] {
		&self.targets
	}

	pub fn replacements(&self) -> &[Replacement] {
		&self.replacements
	}

	/// Run the replacement chain over one string. Each step sees the
	/// output of the previous one.
	pub fn rewrite(&self, input: &str) -> String {
		self.replacements
			.iter()
			.fold(input.to_string(), |text, replacement| replacement.apply(&text))
	}

	/// Rewrite the targeted fields of a record in place.
	///
	/// Text targets are only touched when they hold a string, `choices`
	/// only when it holds an array; other shapes are left alone.
	pub fn apply(&self, record: &mut Record) {
		for target in &self.targets {
			let Some(value) = record.get_mut(target.field_name()) else {
				continue;
			};

			match (target, value) {
				(Target::Choices, Value::Array(choices)) => {
					for choice in choices.iter_mut() {
						if let Value::String(text) = choice {
							*text = self.rewrite(text);
						}
					}
				}
				(Target::QuestionText | Target::Explanation, Value::String(text)) => {
					*text = self.rewrite(text);
				}
				_ => {}
			}
		}
	}
}

/// Translate a rules-file substitution template into `regex` syntax.
///
/// Back-references are written `\1` or `\g<name>`; `$` is literal.
/// `\\`, `\n`, `\t`, `\r` and octal `\0`..`\077` are escapes; any other
/// backslash is kept.
pub fn backref_template(to: &str) -> String {
	let mut out = String::with_capacity(to.len());
	let mut chars = to.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'$' => out.push_str("$$"),
			'\\' => match chars.peek().copied() {
				// `\0` starts an octal escape, not a group reference.
				Some('0') => {
					let mut code = 0u32;
					let mut len = 0;
					while len < 3
						&& let Some(d) = chars.peek().copied()
						&& let Some(digit) = d.to_digit(8)
					{
						code = code * 8 + digit;
						len += 1;
						chars.next();
					}
					if let Some(ch) = char::from_u32(code) {
						out.push(ch);
					}
				}
				Some(d) if d.is_ascii_digit() => {
					let mut group = String::new();
					while group.len() < 2
						&& let Some(d) = chars.peek().copied()
						&& d.is_ascii_digit()
					{
						group.push(d);
						chars.next();
					}
					out.push_str(&format!("${{{group}}}"));
				}
				Some('g') => {
					chars.next();
					if chars.peek() == Some(&'<') {
						chars.next();
						let mut name = String::new();
						let mut closed = false;
						for n in chars.by_ref() {
							if n == '>' {
								closed = true;
								break;
							}
							name.push(n);
						}
						if closed {
							out.push_str(&format!("${{{name}}}"));
						} else {
							out.push_str("\\g<");
							out.push_str(&name.replace('$', "$$"));
						}
					} else {
						out.push_str("\\g");
					}
				}
				Some('\\') => {
					chars.next();
					out.push('\\');
				}
				Some('n') => {
					chars.next();
					out.push('\n');
				}
				Some('t') => {
					chars.next();
					out.push('\t');
				}
				Some('r') => {
					chars.next();
					out.push('\r');
				}
				_ => out.push('\\'),
			},
			other => out.push(other),
		}
	}

	out
}
