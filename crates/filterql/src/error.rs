//! Error types for parsing and evaluating filter expressions.

use std::error::Error as StdError;

use thiserror::Error;

use crate::ast::LiteralKind;
use crate::lexer::TokenKind;

/// Failure reported by a host accessor function.
///
/// The boxed error travels through evaluation untouched and can be taken back
/// out with [`EvalError::into_host`].
pub type HostError = Box<dyn StdError + Send + Sync>;

/// A specialized Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A specialized Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// What went wrong while parsing a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The parser needed another token but the input was exhausted.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A token of the wrong kind appeared at a grammar position.
    #[error("unexpected token: {found}")]
    UnexpectedToken {
        /// The kind of the offending token.
        found: TokenKind,
    },

    /// No accessor is registered for the call and no fallback is configured.
    #[error("no such method: {name}({arg}){}", did_you_mean(.suggestion))]
    NoSuchMethod {
        /// The call name as written in the query.
        name: String,
        /// Argument type, which selects the method table.
        arg: LiteralKind,
        /// Closest registered name for the same argument type, if any.
        suggestion: Option<String>,
    },

    /// An integer literal does not fit in an `i64`.
    #[error("invalid integer literal: {text}")]
    InvalidInteger {
        /// The literal text.
        text: String,
    },

    /// Parentheses are nested deeper than the parser allows.
    #[error("expression nested deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit that was hit.
        limit: usize,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(", did you mean '{}'?", name),
        None => String::new(),
    }
}

/// A parse failure together with the char offset it was detected at.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{offset}: {kind}")]
pub struct ParseError {
    /// The underlying failure.
    pub kind: ParseErrorKind,
    /// Char (not byte) offset into the query text.
    pub offset: usize,
}

impl ParseError {
    /// Creates an unexpected end of input error.
    pub fn unexpected_end(offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedEnd,
            offset,
        }
    }

    /// Creates an unexpected token error.
    pub fn unexpected_token(found: TokenKind, offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken { found },
            offset,
        }
    }

    /// Creates a no such method error.
    pub fn no_such_method(
        name: impl Into<String>,
        arg: LiteralKind,
        suggestion: Option<String>,
        offset: usize,
    ) -> Self {
        Self {
            kind: ParseErrorKind::NoSuchMethod {
                name: name.into(),
                arg,
                suggestion,
            },
            offset,
        }
    }

    /// Creates an invalid integer literal error.
    pub fn invalid_integer(text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidInteger { text: text.into() },
            offset,
        }
    }

    /// Creates a nesting too deep error.
    pub fn too_deep(limit: usize, offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::TooDeep { limit },
            offset,
        }
    }
}

/// Errors that can occur while evaluating a compiled condition.
///
/// There is no position here: by evaluation time the query text is gone.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A call produced a value whose type the comparison cannot use.
    #[error("type not matched: expected {expected}, got {found}")]
    TypeNotMatched {
        /// Type required by the comparison or membership test.
        expected: &'static str,
        /// Type actually produced by the accessor.
        found: &'static str,
    },

    /// An accessor reported a failure.
    #[error("{0}")]
    Host(HostError),
}

impl EvalError {
    /// Creates a type mismatch error.
    pub fn type_not_matched(expected: &'static str, found: &'static str) -> Self {
        EvalError::TypeNotMatched { expected, found }
    }

    /// Returns true if this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, EvalError::TypeNotMatched { .. })
    }

    /// Borrows the host failure, if this error came from an accessor.
    pub fn host(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            EvalError::Host(err) => Some(err.as_ref()),
            EvalError::TypeNotMatched { .. } => None,
        }
    }

    /// Takes back the host failure exactly as the accessor returned it.
    pub fn into_host(self) -> Option<HostError> {
        match self {
            EvalError::Host(err) => Some(err),
            EvalError::TypeNotMatched { .. } => None,
        }
    }
}

impl From<HostError> for EvalError {
    fn from(err: HostError) -> Self {
        EvalError::Host(err)
    }
}
