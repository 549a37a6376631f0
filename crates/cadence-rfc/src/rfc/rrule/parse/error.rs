//! Recurrence rule text parsing errors.

use std::fmt;

/// Result type for rule text parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for rule text parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// Character position of the offending rule part (1-based).
    pub position: usize,
    /// Additional context about the error.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Nothing to parse.
    EmptyRule,
    /// Rule part without `=`.
    MissingSeparator,
    /// No FREQ part.
    MissingFrequency,
    /// Unknown frequency name.
    InvalidFrequency,
    /// Value that is not an integer of the expected width.
    InvalidInteger,
    /// Unknown weekday or malformed ordinal.
    InvalidWeekday,
    /// UNTIL value that is neither a date nor a date-time.
    InvalidUntil,
    /// The same rule part given twice.
    DuplicatePart,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRule => write!(f, "empty recurrence rule"),
            Self::MissingSeparator => write!(f, "missing '=' in rule part"),
            Self::MissingFrequency => write!(f, "missing FREQ"),
            Self::InvalidFrequency => write!(f, "invalid frequency"),
            Self::InvalidInteger => write!(f, "invalid integer value"),
            Self::InvalidWeekday => write!(f, "invalid weekday"),
            Self::InvalidUntil => write!(f, "invalid UNTIL value"),
            Self::DuplicatePart => write!(f, "duplicate rule part"),
        }
    }
}
