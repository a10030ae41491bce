use std::fmt;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    String(String),
    Boolean(bool),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
        }
    }
}

/// Renders the value the way it would be written in a config file.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => n.fmt(f),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => b.fmt(f),
            Self::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        ",".fmt(f)?;
                    }
                    value.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

/// Convert the text on the right of `=` into a typed value.
///
/// Lists are split one level deep; each element is coerced on its own but is
/// never split again.
#[must_use]
pub fn parse_raw_value(raw: &str) -> Value {
    if let Some(value) = parse_scalar(raw) {
        return value;
    }

    if is_list(raw) {
        let mut elements = raw.split(',').collect::<Vec<&str>>();
        // Trailing empty elements are dropped, leading and interior ones are kept.
        while elements.last().is_some_and(|e| e.is_empty()) {
            _ = elements.pop();
        }

        return Value::List(
            elements
                .into_iter()
                .map(|element| parse_scalar(element).unwrap_or_else(|| element.into()))
                .collect(),
        );
    }

    raw.into()
}

/// Integers and quoted strings. Anything else is left to the caller.
fn parse_scalar(raw: &str) -> Option<Value> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        // Digit runs too large for an i64 stay as text.
        return Some(raw.parse::<i64>().map_or_else(|_| raw.into(), Value::Integer));
    }

    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    if inner.contains('"') {
        return None;
    }

    Some(inner.into())
}

/// True when some comma has at least one character on each side.
fn is_list(raw: &str) -> bool {
    raw.char_indices()
        .any(|(i, c)| c == ',' && i > 0 && i + 1 < raw.len())
}

/// Rewrite the literal forms of `true` and `false` into booleans.
///
/// Only scalars are rewritten; list elements keep their coerced type.
#[must_use]
pub fn canonicalize_boolean(value: Value) -> Value {
    match value {
        Value::Integer(1) => Value::Boolean(true),
        Value::Integer(0) => Value::Boolean(false),
        Value::String(s) if matches!(s.as_str(), "on" | "yes" | "true") => Value::Boolean(true),
        Value::String(s) if matches!(s.as_str(), "off" | "no" | "false") => Value::Boolean(false),
        other => other,
    }
}
