//! Converts the text after a command token into typed arguments.
//!
//! Binding walks the [Schema] in order, pulling whitespace-delimited tokens from
//! a cursor over the input. A trailing [ArgKind::Text] field takes the unsplit
//! remainder instead of a single token. The first failure stops binding and is
//! returned as a [ParseError]. Binding is pure: the same input and schema always
//! produce the same result.
use super::errors::{ArgumentError, ParseError};
use super::schema::{ArgKind, ArgValue, ArgumentField, Schema};

/// Literals accepted for [ArgKind::Boolean], matched case-insensitively.
const TRUE_LITERALS: &[&str] = &["true", "yes", "on", "1"];
const FALSE_LITERALS: &[&str] = &["false", "no", "off", "0"];

/// Whitespace tokenizer that can hand back the unsplit remainder.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn remainder(&mut self) -> Option<&'a str> {
        let text = self.rest.trim();
        self.rest = "";
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Split a raw chat line into its command token and the argument text.
///
/// The token keeps its prefix character; the argument text is everything after
/// the first whitespace run (possibly empty).
pub fn split_command(raw: &str) -> (&str, &str) {
    let trimmed = raw.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    }
}

/// Bind `input` (the text after the command token) against `schema`.
pub fn bind(schema: &Schema, input: &str) -> Result<BoundArguments, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut values = Vec::with_capacity(schema.len());

    for field in schema.fields() {
        let value = match field.kind {
            ArgKind::Text => match cursor.remainder() {
                Some(text) => ArgValue::Text(text.to_string()),
                None => absent(field)?,
            },
            ArgKind::Coordinate => match cursor.next_token() {
                Some(first) => {
                    let second = cursor.next_token().ok_or_else(|| invalid(field, first))?;
                    convert_coordinate(field, first, second)?
                }
                None => absent(field)?,
            },
            _ => match cursor.next_token() {
                Some(token) => convert(field, token)?,
                None => absent(field)?,
            },
        };
        values.push((field.name.clone(), value));
    }

    if let Some(token) = cursor.next_token() {
        return Err(ParseError::UnexpectedArgument { token: token.to_string() });
    }

    Ok(BoundArguments { values })
}

fn absent(field: &ArgumentField) -> Result<ArgValue, ParseError> {
    if field.required {
        Err(ParseError::ArgumentMissing { field: field.name.clone() })
    } else {
        Ok(field.default_value())
    }
}

fn invalid(field: &ArgumentField, raw: &str) -> ParseError {
    ParseError::ArgumentInvalidType {
        field: field.name.clone(),
        raw: raw.to_string(),
    }
}

fn convert(field: &ArgumentField, token: &str) -> Result<ArgValue, ParseError> {
    match field.kind {
        ArgKind::Integer => parse_integer(token)
            .map(ArgValue::Integer)
            .ok_or_else(|| invalid(field, token)),
        ArgKind::Unsigned => parse_unsigned::<u32>(token)
            .map(ArgValue::Unsigned)
            .ok_or_else(|| invalid(field, token)),
        ArgKind::Boolean => parse_boolean(token)
            .map(ArgValue::Boolean)
            .ok_or_else(|| invalid(field, token)),
        ArgKind::Str => Ok(ArgValue::Str(token.to_string())),
        ArgKind::Choice => field
            .allowed_values
            .iter()
            .find(|allowed| allowed.eq_ignore_ascii_case(token))
            .map(|allowed| ArgValue::Choice(allowed.clone()))
            .ok_or_else(|| ParseError::ArgumentNotInAllowedSet {
                field: field.name.clone(),
                allowed: field.allowed_values.clone(),
            }),
        // Multi-token kinds are handled by the caller.
        ArgKind::Coordinate | ArgKind::Text => Err(invalid(field, token)),
    }
}

fn convert_coordinate(field: &ArgumentField, x: &str, y: &str) -> Result<ArgValue, ParseError> {
    let x = parse_unsigned::<u16>(x).ok_or_else(|| invalid(field, x))?;
    let y = parse_unsigned::<u16>(y).ok_or_else(|| invalid(field, y))?;
    Ok(ArgValue::Coordinate { x, y })
}

/// ASCII digits only; no sign, no separators, no locale-specific digits.
fn parse_unsigned<T: std::str::FromStr>(token: &str) -> Option<T> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_integer(token: &str) -> Option<i32> {
    let digits = token.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_boolean(token: &str) -> Option<bool> {
    if TRUE_LITERALS.iter().any(|l| l.eq_ignore_ascii_case(token)) {
        Some(true)
    } else if FALSE_LITERALS.iter().any(|l| l.eq_ignore_ascii_case(token)) {
        Some(false)
    } else {
        None
    }
}

/// Fully bound argument record, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArguments {
    values: Vec<(String, ArgValue)>,
}

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&ArgValue, ArgumentError> {
        self.get(name).ok_or_else(|| ArgumentError::Unknown(name.to_string()))
    }

    fn wrong_kind(name: &str, expected: &'static str) -> ArgumentError {
        ArgumentError::WrongKind {
            field: name.to_string(),
            expected,
        }
    }

    pub fn integer(&self, name: &str) -> Result<i32, ArgumentError> {
        match self.require(name)? {
            ArgValue::Integer(v) => Ok(*v),
            _ => Err(Self::wrong_kind(name, "an integer")),
        }
    }

    pub fn unsigned(&self, name: &str) -> Result<u32, ArgumentError> {
        match self.require(name)? {
            ArgValue::Unsigned(v) => Ok(*v),
            _ => Err(Self::wrong_kind(name, "unsigned")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ArgumentError> {
        match self.require(name)? {
            ArgValue::Boolean(v) => Ok(*v),
            _ => Err(Self::wrong_kind(name, "a boolean")),
        }
    }

    /// String view of a word, choice or free-text argument.
    pub fn text(&self, name: &str) -> Result<&str, ArgumentError> {
        match self.require(name)? {
            ArgValue::Str(s) | ArgValue::Choice(s) | ArgValue::Text(s) => Ok(s),
            _ => Err(Self::wrong_kind(name, "text")),
        }
    }

    pub fn coordinate(&self, name: &str) -> Result<(u16, u16), ArgumentError> {
        match self.require(name)? {
            ArgValue::Coordinate { x, y } => Ok((*x, *y)),
            _ => Err(Self::wrong_kind(name, "a coordinate")),
        }
    }
}
