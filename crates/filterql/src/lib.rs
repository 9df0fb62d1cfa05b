//! Compile-once, evaluate-many filter expressions.
//!
//! A query such as `rec('Source') = 1 and not rec('Name') in ('Egg', 'Fig')`
//! is compiled into an immutable [`Condition`] tree that can be evaluated
//! against any number of records. The names in a query (`rec` above) are not
//! built in: the host registers them as accessor functions on a
//! [`ParseConfig`], keyed by name and by whether they take an integer or a
//! string argument.
//!
//! # Syntax
//!
//! - Calls: `name(42)`, `name('text')`; a bare call is true when its value is
//!   non-zero, non-empty or `true`
//! - Comparisons: `=`, `<>`, `<`, `<=`, `>`, `>=` against a literal or another call
//! - Membership: `call IN (1, 2, 3)` or `call IN other('list')`
//! - Boolean operators: `AND`, `OR`, `NOT` (case-insensitive) and parentheses
//! - Strings are single-quoted; `\'`, `\t`, `\n` and `\r` are escapes
//!
//! # Example
//!
//! ```
//! use filterql::{ParseConfig, Value};
//!
//! struct Fruit {
//!     name: &'static str,
//!     level: i64,
//! }
//!
//! let config = ParseConfig::<Fruit>::new().with_str_method("rec", |fruit: &Fruit, field: &str| {
//!     match field {
//!         "Name" => Ok(Value::from(fruit.name)),
//!         "Level" => Ok(Value::from(fruit.level)),
//!         other => Err(format!("no such field: {}", other).into()),
//!     }
//! });
//!
//! let fruits = [
//!     Fruit { name: "Apple", level: 10 },
//!     Fruit { name: "Banana", level: 6 },
//!     Fruit { name: "Fig", level: 5 },
//! ];
//!
//! let cond = filterql::parse("rec('Level') < 10 and not rec('Name') in ('Egg', 'Fig')", &config)
//!     .unwrap();
//! let names: Vec<_> = cond.filter(&fruits).unwrap().iter().map(|f| f.name).collect();
//! assert_eq!(names, ["Banana"]);
//! ```

mod ast;
mod cache;
mod config;
mod context;
mod error;
mod lexer;
mod parser;
mod value;

use std::sync::Arc;

pub use ast::{
    Call, Compare, CompareOp, CompareWithCall, Condition, InWithCall, Literal, LiteralKind,
    Membership, Operand,
};
pub use cache::{CacheProvider, LruCache, MapCache};
pub use config::{
    CacheConfig, DefaultIntMethod, DefaultStrMethod, IntMethod, ParseConfig, StrMethod,
    DEFAULT_LRU_CAPACITY,
};
pub use context::Context;
pub use error::{EvalError, EvalResult, HostError, ParseError, ParseErrorKind, ParseResult};
pub use lexer::{decode_int, decode_string, Lexer, Token, TokenKind};
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use value::Value;

/// Compiles `query` with `config`, using the configured cache if any.
///
/// Shorthand for [`Parser::parse`].
pub fn parse<E: ?Sized + 'static>(
    query: &str,
    config: &ParseConfig<E>,
) -> ParseResult<Arc<Condition<E>>> {
    Parser::parse(query, config)
}

#[cfg(test)]
mod tests;
