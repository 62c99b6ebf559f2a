/// Starter rules file written by `quiz-rules --init`.
pub fn generate_rules_template() -> String {
	r#"{
  "actions": [
    {
      "type": "delete",
      "where": { "questionText_contains": "DEPRECATED" }
    },
    {
      "type": "text_replace",
      "where": {},
      "target": ["questionText", "explanation", "choices"],
      "replacements": [
        { "from": "colour", "to": "color" },
        { "from": "\\s{2,}", "to": " ", "regex": true }
      ]
    },
    {
      "type": "set_fields",
      "where": { "questionText_regex": "^What is \\d+\\s*[-+*/]\\s*\\d+\\?$" },
      "fields": { "difficulty": "easy" }
    },
    {
      "type": "add",
      "questions": []
    }
  ],
  "structureMigration": {
    "rename": {},
    "drop": [],
    "add": {}
  }
}
"#
	.to_string()
}
