use thiserror::Error;

/// First failure encountered while binding arguments.
///
/// All variants are expected, caller-facing failures; they map to a localized
/// message and never indicate a server fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required field had no token left to consume.
    #[error("missing argument: {field}")]
    ArgumentMissing { field: String },

    /// The token could not be converted to the field's declared kind.
    #[error("invalid value '{raw}' for argument {field}")]
    ArgumentInvalidType { field: String, raw: String },

    /// The value converted but is not one of the field's allowed values.
    #[error("argument {field} must be one of: {}", .allowed.join(", "))]
    ArgumentNotInAllowedSet { field: String, allowed: Vec<String> },

    /// Input continued after every field was bound.
    #[error("unexpected argument '{token}'")]
    UnexpectedArgument { token: String },
}

impl ParseError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::ArgumentMissing { field }
            | ParseError::ArgumentInvalidType { field, .. }
            | ParseError::ArgumentNotInAllowedSet { field, .. } => Some(field),
            ParseError::UnexpectedArgument { .. } => None,
        }
    }
}

/// Errors raised while populating the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Another descriptor already owns this key (case-insensitive).
    #[error("duplicate command key: {0}")]
    DuplicateKey(String),

    /// Two descriptors were built with the same identity.
    #[error("duplicate command identity {identity} (keys {first} and {second})")]
    DuplicateIdentity {
        identity: uuid::Uuid,
        first: String,
        second: String,
    },

    /// A key must be a single token starting with the command prefix.
    #[error("invalid command key '{0}'")]
    InvalidKey(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Violations of the argument layout rules, reported by the schema builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required field {field} follows an optional field")]
    RequiredAfterOptional { field: String },

    #[error("free-text field {field} must be the last field")]
    TextNotLast { field: String },

    #[error("field {field} declares allowed values but is not a choice field")]
    AllowedValuesOnNonChoice { field: String },

    #[error("choice field {field} has no allowed values")]
    EmptyAllowedSet { field: String },

    #[error("duplicate field name {field}")]
    DuplicateField { field: String },

    #[error("default for field {field} does not match its kind")]
    DefaultKindMismatch { field: String },

    #[error("required field {field} cannot declare a default")]
    DefaultOnRequired { field: String },

    #[error("optional choice field {field} must declare a default")]
    OptionalChoiceWithoutDefault { field: String },
}

/// Returned by typed accessors on bound arguments when a handler asks for a
/// field that was not declared, or asks for it as the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("no argument named {0}")]
    Unknown(String),

    #[error("argument {field} is not {expected}")]
    WrongKind { field: String, expected: &'static str },
}
