//! Explicit, build-time argument layouts for commands.
//!
//! A [Schema] is an ordered list of [ArgumentField]s assembled with
//! [Schema::builder]. The builder enforces the layout rules once, at startup,
//! so that binding never has to second-guess a schema:
//!
//! * required fields precede optional fields
//! * at most one free-text field, and it is last
//! * allowed values only on choice fields, never empty
//! * field names are unique (case-insensitive)
//!
//! ```
//! use chatcommand::command::schema::{ArgKind, Schema};
//!
//! let schema = Schema::builder()
//!     .choice("stat", &["str", "agi", "vit", "ene", "cmd"])
//!     .required("amount", ArgKind::Unsigned)
//!     .required("character", ArgKind::Str)
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.usage("/set"), "/set <stat:str|agi|vit|ene|cmd> <amount> <character>");
//! ```
use std::fmt;

use super::errors::SchemaError;

/// Declared type of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Signed 32-bit integer.
    Integer,
    /// Unsigned 32-bit integer.
    Unsigned,
    /// One of `true/false/yes/no/on/off/1/0`.
    Boolean,
    /// A single whitespace-free token.
    Str,
    /// A single token restricted to the field's allowed values.
    Choice,
    /// Two consecutive unsigned tokens, `x y`.
    Coordinate,
    /// The unsplit rest of the line.
    Text,
}

impl ArgKind {
    pub fn describe(self) -> &'static str {
        match self {
            ArgKind::Integer => "an integer",
            ArgKind::Unsigned => "a positive number",
            ArgKind::Boolean => "a boolean",
            ArgKind::Str => "a word",
            ArgKind::Choice => "a choice",
            ArgKind::Coordinate => "a coordinate",
            ArgKind::Text => "text",
        }
    }

    /// Value assigned to an absent optional field that declares no default.
    /// Choice fields never reach this: an optional choice must declare one.
    pub fn type_default(self) -> ArgValue {
        match self {
            ArgKind::Integer => ArgValue::Integer(0),
            ArgKind::Unsigned => ArgValue::Unsigned(0),
            ArgKind::Boolean => ArgValue::Boolean(false),
            ArgKind::Str => ArgValue::Str(String::new()),
            ArgKind::Choice => ArgValue::Choice(String::new()),
            ArgKind::Coordinate => ArgValue::Coordinate { x: 0, y: 0 },
            ArgKind::Text => ArgValue::Text(String::new()),
        }
    }
}

/// A bound, typed argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    Integer(i32),
    Unsigned(u32),
    Boolean(bool),
    Str(String),
    Choice(String),
    Coordinate { x: u16, y: u16 },
    Text(String),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Integer(_) => ArgKind::Integer,
            ArgValue::Unsigned(_) => ArgKind::Unsigned,
            ArgValue::Boolean(_) => ArgKind::Boolean,
            ArgValue::Str(_) => ArgKind::Str,
            ArgValue::Choice(_) => ArgKind::Choice,
            ArgValue::Coordinate { .. } => ArgKind::Coordinate,
            ArgValue::Text(_) => ArgKind::Text,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Integer(v) => write!(f, "{}", v),
            ArgValue::Unsigned(v) => write!(f, "{}", v),
            ArgValue::Boolean(v) => write!(f, "{}", v),
            ArgValue::Str(s) | ArgValue::Choice(s) | ArgValue::Text(s) => f.write_str(s),
            ArgValue::Coordinate { x, y } => write!(f, "{} {}", x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentField {
    pub name: String,
    pub position: usize,
    pub required: bool,
    pub kind: ArgKind,
    /// Only populated for [ArgKind::Choice].
    pub allowed_values: Vec<String>,
    pub default: Option<ArgValue>,
}

impl ArgumentField {
    /// Value for an optional field whose token is absent.
    pub fn default_value(&self) -> ArgValue {
        self.default.clone().unwrap_or_else(|| self.kind.type_default())
    }

    fn usage_fragment(&self) -> String {
        let inner = match self.kind {
            ArgKind::Choice => format!("{}:{}", self.name, self.allowed_values.join("|")),
            ArgKind::Coordinate => format!("{}:x y", self.name),
            ArgKind::Text => format!("{}...", self.name),
            _ => self.name.clone(),
        };
        if self.required {
            format!("<{}>", inner)
        } else {
            format!("[{}]", inner)
        }
    }
}

/// Ordered argument layout of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<ArgumentField>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Schema of a command that takes no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[ArgumentField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }

    pub fn has_text_tail(&self) -> bool {
        self.fields.last().map(|f| f.kind == ArgKind::Text).unwrap_or(false)
    }

    /// Render a one-line usage hint such as `/move <character> <map> <pos:x y>`.
    pub fn usage(&self, key: &str) -> String {
        let mut out = key.to_string();
        for field in &self.fields {
            out.push(' ');
            out.push_str(&field.usage_fragment());
        }
        out
    }
}

/// Collects fields and validates the layout in [SchemaBuilder::build].
///
/// `allowed` and `with_default` modify the most recently added field.
#[derive(Debug)]
pub struct SchemaBuilder {
    fields: Vec<ArgumentField>,
}

impl SchemaBuilder {
    fn push(mut self, name: &str, kind: ArgKind, required: bool) -> Self {
        let position = self.fields.len();
        self.fields.push(ArgumentField {
            name: name.to_string(),
            position,
            required,
            kind,
            allowed_values: Vec::new(),
            default: None,
        });
        self
    }

    pub fn required(self, name: &str, kind: ArgKind) -> Self {
        self.push(name, kind, true)
    }

    pub fn optional(self, name: &str, kind: ArgKind) -> Self {
        self.push(name, kind, false)
    }

    /// Required choice field restricted to `values`.
    pub fn choice(self, name: &str, values: &[&str]) -> Self {
        self.push(name, ArgKind::Choice, true).allowed(values)
    }

    /// Trailing free-text field.
    pub fn text(self, name: &str, required: bool) -> Self {
        self.push(name, ArgKind::Text, required)
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.allowed_values = values.iter().map(|v| v.to_string()).collect();
        }
        self
    }

    pub fn with_default(mut self, value: ArgValue) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.default = Some(value);
        }
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen_optional = false;
        let mut names: Vec<String> = Vec::with_capacity(self.fields.len());
        let last_index = self.fields.len().saturating_sub(1);

        for (i, field) in self.fields.iter().enumerate() {
            let lowered = field.name.to_lowercase();
            if names.contains(&lowered) {
                return Err(SchemaError::DuplicateField { field: field.name.clone() });
            }
            names.push(lowered);

            if field.required && seen_optional {
                return Err(SchemaError::RequiredAfterOptional { field: field.name.clone() });
            }
            seen_optional |= !field.required;

            if field.kind == ArgKind::Text && i != last_index {
                return Err(SchemaError::TextNotLast { field: field.name.clone() });
            }

            match (field.kind, field.allowed_values.is_empty()) {
                (ArgKind::Choice, true) => {
                    return Err(SchemaError::EmptyAllowedSet { field: field.name.clone() })
                }
                (ArgKind::Choice, false) if !field.required && field.default.is_none() => {
                    return Err(SchemaError::OptionalChoiceWithoutDefault { field: field.name.clone() })
                }
                (ArgKind::Choice, false) | (_, true) => {}
                (_, false) => {
                    return Err(SchemaError::AllowedValuesOnNonChoice { field: field.name.clone() })
                }
            }

            if let Some(default) = &field.default {
                if field.required {
                    return Err(SchemaError::DefaultOnRequired { field: field.name.clone() });
                }
                let fits = default.kind() == field.kind
                    && match default {
                        ArgValue::Choice(v) => field.allowed_values.iter().any(|a| a == v),
                        _ => true,
                    };
                if !fits {
                    return Err(SchemaError::DefaultKindMismatch { field: field.name.clone() });
                }
            }
        }

        Ok(Schema { fields: self.fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_required_after_optional() {
        let err = Schema::builder()
            .optional("minutes", ArgKind::Unsigned)
            .required("character", ArgKind::Str)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::RequiredAfterOptional { field: "character".into() });
    }

    #[test]
    fn rejects_text_before_other_fields() {
        let err = Schema::builder()
            .text("reason", true)
            .required("character", ArgKind::Str)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::TextNotLast { field: "reason".into() });
    }

    #[test]
    fn rejects_second_text_field() {
        let err = Schema::builder().text("a", true).text("b", false).build().unwrap_err();
        assert!(matches!(err, SchemaError::TextNotLast { .. }));
    }

    #[test]
    fn allowed_values_only_on_choice() {
        let err = Schema::builder()
            .required("amount", ArgKind::Unsigned)
            .allowed(&["1", "2"])
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::AllowedValuesOnNonChoice { field: "amount".into() });

        let err = Schema::builder().required("stat", ArgKind::Choice).build().unwrap_err();
        assert_eq!(err, SchemaError::EmptyAllowedSet { field: "stat".into() });
    }

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let err = Schema::builder()
            .required("Name", ArgKind::Str)
            .required("name", ArgKind::Str)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn defaults_must_match_kind_and_be_optional() {
        let err = Schema::builder()
            .optional("minutes", ArgKind::Unsigned)
            .with_default(ArgValue::Integer(-1))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultKindMismatch { .. }));

        let err = Schema::builder()
            .required("minutes", ArgKind::Unsigned)
            .with_default(ArgValue::Unsigned(60))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultOnRequired { .. }));

        let schema = Schema::builder()
            .optional("minutes", ArgKind::Unsigned)
            .with_default(ArgValue::Unsigned(60))
            .build()
            .unwrap();
        assert_eq!(schema.fields()[0].default_value(), ArgValue::Unsigned(60));
    }

    #[test]
    fn optional_choice_needs_a_default_from_its_set() {
        let err = Schema::builder()
            .required("character", ArgKind::Str)
            .optional("stat", ArgKind::Choice)
            .allowed(&["str", "agi"])
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::OptionalChoiceWithoutDefault { field: "stat".into() });

        let err = Schema::builder()
            .optional("stat", ArgKind::Choice)
            .allowed(&["str", "agi"])
            .with_default(ArgValue::Choice("luck".into()))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DefaultKindMismatch { field: "stat".into() });

        let schema = Schema::builder()
            .required("character", ArgKind::Str)
            .optional("stat", ArgKind::Choice)
            .allowed(&["str", "agi"])
            .with_default(ArgValue::Choice("agi".into()))
            .build()
            .unwrap();
        assert_eq!(schema.fields()[1].default_value(), ArgValue::Choice("agi".into()));
    }

    #[test]
    fn usage_marks_optional_and_text_fields() {
        let schema = Schema::builder()
            .required("character", ArgKind::Str)
            .optional("minutes", ArgKind::Unsigned)
            .build()
            .unwrap();
        assert_eq!(schema.usage("/chatban"), "/chatban <character> [minutes]");

        let schema = Schema::builder().text("message", true).build().unwrap();
        assert_eq!(schema.usage("/post"), "/post <message...>");
        assert!(schema.has_text_tail());
    }
}
