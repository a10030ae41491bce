use std::{error, fmt, io};

/// Failure while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read config")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl LoadError {
    /// The syntax error, if this is one.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Io(_) => None,
        }
    }
}

/// A line that matched none of the recognized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    line: usize,
    section: Option<String>,
    kind: SyntaxErrorKind,
}

impl SyntaxError {
    #[must_use]
    pub(crate) fn new(line: usize, section: Option<String>, kind: SyntaxErrorKind) -> Self {
        Self {
            line,
            section,
            kind,
        }
    }

    /// 1-based line number of the offending line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Section that was current when the error occurred.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }
}

impl error::Error for SyntaxError {}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error on line {}", self.line)?;
        if let Some(ref section) = self.section {
            write!(f, " in section [{section}]")?;
        }
        write!(f, ": {}", self.kind)
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `key = value` line appeared before any `[section]` header.
    AssignmentOutsideSection,
    /// Not blank, a comment, a header, or an assignment.
    UnrecognizedLine,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AssignmentOutsideSection => "assignment before any section header".fmt(f),
            Self::UnrecognizedLine => "expected a section header or key = value".fmt(f),
        }
    }
}
