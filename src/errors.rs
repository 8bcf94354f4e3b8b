//! Quen error handling.
//!
//! A single error type flows through the whole pipeline. Every error carries
//! an [`ErrorKind`] plus a stack of source positions: the first evaluator
//! frame an error crosses records the position of the element being
//! evaluated, and every call boundary above it records the call site. The
//! top-level renderer walks that stack, printing each frame with the
//! registered source line, followed by the innermost message.

use std::fmt;

use crate::runtime::source;
use crate::syntax::Position;

pub type Result<T> = std::result::Result<T, QuenError>;

/// All error kinds as a single enum, categorised per the runtime taxonomy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    // Name errors
    #[error("unknown variable {name}")]
    UnknownVariable { name: String },
    #[error("couldn't assign to name, {name} already exists")]
    NameExists { name: String },

    // Type errors
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
    #[error("first in call must evaluate to block, got {actual} instead")]
    NotCallable { actual: String },
    #[error("first argument in call to basic block must be unit, not {actual}")]
    BlockUnitArg { actual: String },
    #[error("too many arguments in call to basic block ({count})")]
    BlockTooManyArgs { count: usize },
    #[error("can't run this block without an environment")]
    EnvRequired,
    #[error("{value} has no {attr} attribute")]
    AttributeMissing { attr: String, value: String },
    #[error("wrong tag when unwrapping opaque value")]
    OpaqueTagMismatch,
    #[error("duplicate attribute tag on opaque value")]
    DuplicateAttribute,
    #[error("matcher must produce [bool bindings], got {actual}")]
    MalformedMatcher { actual: String },
    #[error("block bindings must be a list of [atom value] pairs, got {actual}")]
    MalformedBindings { actual: String },

    // Arity errors
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: String, actual: usize },

    // Range errors
    #[error("index out of range ({index} with length {length})")]
    IndexOutOfRange { index: String, length: usize },
    #[error("{bound} ({value}) is too large")]
    SliceOutOfRange { bound: &'static str, value: usize },
    #[error("from ({from}) is bigger than to ({to})")]
    SliceReversed { from: usize, to: usize },
    #[error("{value} is not an integer")]
    NotAnInteger { value: String },
    #[error("{value} is smaller than 0")]
    Negative { value: String },
    #[error("{value} is too large")]
    TooLarge { value: String },

    // Arithmetic errors
    #[error("denominator is zero")]
    DivisionByZero,

    // External failures, surfaced with their original message
    #[error("{message}")]
    Parse { message: String },
    #[error("{message}")]
    Io { message: String },
}

/// Coarse error category, used by tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Name,
    Type,
    Arity,
    Range,
    Arithmetic,
    Parse,
    Io,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownVariable { .. } | Self::NameExists { .. } => ErrorCategory::Name,

            Self::TypeMismatch { .. }
            | Self::NotCallable { .. }
            | Self::BlockUnitArg { .. }
            | Self::BlockTooManyArgs { .. }
            | Self::EnvRequired
            | Self::AttributeMissing { .. }
            | Self::OpaqueTagMismatch
            | Self::DuplicateAttribute
            | Self::MalformedMatcher { .. }
            | Self::MalformedBindings { .. } => ErrorCategory::Type,

            Self::ArityMismatch { .. } => ErrorCategory::Arity,

            Self::IndexOutOfRange { .. }
            | Self::SliceOutOfRange { .. }
            | Self::SliceReversed { .. }
            | Self::NotAnInteger { .. }
            | Self::Negative { .. }
            | Self::TooLarge { .. } => ErrorCategory::Range,

            Self::DivisionByZero => ErrorCategory::Arithmetic,

            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }
}

/// The crate-wide error: a kind plus the stack of positions it crossed.
///
/// Positions are pushed innermost-first; rendering walks them outermost-first
/// so the output reads from the call site down to the failing element.
#[derive(Debug, Clone)]
pub struct QuenError {
    pub kind: ErrorKind,
    trace: Vec<Position>,
}

impl QuenError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            trace: Vec::new(),
        }
    }

    /// Record the position of the element an error first surfaced in.
    /// A no-op when a deeper frame already recorded one.
    pub fn positioned(mut self, pos: &Position) -> Self {
        if self.trace.is_empty() {
            self.trace.push(pos.clone());
        }
        self
    }

    /// Record a call-site position. Stacks on top of existing frames.
    pub fn with_call_site(mut self, pos: &Position) -> Self {
        self.trace.push(pos.clone());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn trace(&self) -> &[Position] {
        &self.trace
    }

    pub fn type_mismatch(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected,
            actual: actual.into(),
        })
    }

    pub fn arity_mismatch(expected: impl Into<String>, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            expected: expected.into(),
            actual,
        })
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
        })
    }
}

impl From<ErrorKind> for QuenError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for QuenError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            message: err.to_string(),
        })
    }
}

impl std::error::Error for QuenError {}

impl fmt::Display for QuenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in self.trace.iter().rev() {
            writeln!(f, "{}:{}:{}", pos.path, pos.line, pos.column)?;
            if let Some(line) = source::line(&pos.path, pos.line) {
                writeln!(f, "\t{}", line.trim())?;
            }
        }
        write!(f, "{}", self.kind)
    }
}
