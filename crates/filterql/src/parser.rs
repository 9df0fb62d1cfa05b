//! Recursive descent parser for filter expressions.

use std::sync::Arc;

use crate::ast::{
    Call, Compare, CompareOp, CompareWithCall, Condition, InWithCall, Literal, LiteralKind,
    Membership, Operand,
};
use crate::config::ParseConfig;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{decode_int, decode_string, Lexer, Token, TokenKind};

/// How many parenthesized groups may be open at once.
///
/// Parsing, negation, evaluation and dropping all recurse over the tree, so
/// its depth has to be bounded. Runs of `NOT` do not count against this
/// limit; they collapse while parsing.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parser for filter expressions.
///
/// Tokens are pulled from the [`Lexer`] one at a time; the parser only ever
/// looks at the current token. Calls are resolved against the
/// [`ParseConfig`] as soon as they are read, and `NOT` is applied with
/// [`Condition::negate`] the moment its operand is complete, so the finished
/// tree contains no `Not` nodes.
///
/// # Grammar
///
/// ```text
/// condition  ::= item ("OR" item)*
/// item       ::= atom ("AND" atom)*
/// atom       ::= "(" condition ")" | "NOT" atom | comparison
/// comparison ::= call
///              | call relop literal
///              | call relop call
///              | call "IN" "(" literal ("," literal)* ")"
///              | call "IN" call
/// call       ::= identifier "(" literal ")"
/// relop      ::= "=" | "<>" | "<" | "<=" | ">" | ">="
/// literal    ::= integer | string
/// ```
///
/// Keywords are case-insensitive. All literals in one `IN` list must have the
/// type of the first one; a list with a single literal compiles to `=`.
/// Groups nest at most [`MAX_NESTING_DEPTH`] deep.
pub struct Parser<'c, E: ?Sized> {
    lexer: Lexer,
    current: Token,
    config: &'c ParseConfig<E>,
    depth: usize,
}

impl<'c, E: ?Sized + 'static> Parser<'c, E> {
    /// Compiles `query`, going through the configured cache if there is one.
    ///
    /// On a cache hit the stored tree is returned as is, without tokenizing.
    /// Only successful compiles are stored.
    pub fn parse(query: &str, config: &'c ParseConfig<E>) -> ParseResult<Arc<Condition<E>>> {
        let Some(cache) = config.cache() else {
            return Self::compile(query, config).map(Arc::new);
        };

        if let Some(cond) = cache.load(query) {
            tracing::debug!(query, "compiled query cache hit");
            return Ok(cond);
        }
        tracing::debug!(query, "compiled query cache miss");

        let cond = Arc::new(Self::compile(query, config)?);
        cache.store(query, Arc::clone(&cond));
        Ok(cond)
    }

    /// Compiles `query` into a fresh tree. The cache is not consulted.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; see
    /// [`ParseErrorKind`](crate::ParseErrorKind) for the possible failures.
    pub fn compile(query: &str, config: &'c ParseConfig<E>) -> ParseResult<Condition<E>> {
        let mut lexer = Lexer::new(query);
        let current = lexer.next_token();
        let mut parser = Self {
            lexer,
            current,
            config,
            depth: 0,
        };

        let result = parser.parse_condition().and_then(|cond| {
            // Everything must be consumed
            parser.expect(TokenKind::Eof)?;
            Ok(cond)
        });
        if let Err(err) = &result {
            tracing::debug!(query, offset = err.offset, error = %err.kind, "failed to compile query");
        }
        result
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here())
        }
    }

    /// The error for a current token that does not fit the grammar.
    fn error_here(&self) -> ParseError {
        match self.current.kind {
            // An unterminated string swallowed the rest of the input
            TokenKind::Eof | TokenKind::UnterminatedStr => {
                ParseError::unexpected_end(self.lexer.input_len())
            }
            kind => ParseError::unexpected_token(kind, self.current.offset),
        }
    }

    /// Parses `item ("OR" item)*`
    fn parse_condition(&mut self) -> ParseResult<Condition<E>> {
        let mut items = vec![self.parse_item()?];
        while self.check(TokenKind::Or) {
            self.advance();
            items.push(self.parse_item()?);
        }
        Ok(Condition::or(items))
    }

    /// Parses `atom ("AND" atom)*`
    fn parse_item(&mut self) -> ParseResult<Condition<E>> {
        let mut atoms = vec![self.parse_atom()?];
        while self.check(TokenKind::And) {
            self.advance();
            atoms.push(self.parse_atom()?);
        }
        Ok(Condition::and(atoms))
    }

    fn parse_atom(&mut self) -> ParseResult<Condition<E>> {
        let mut nots = 0usize;
        while self.check(TokenKind::Not) {
            self.advance();
            nots += 1;
        }

        let cond = if self.check(TokenKind::LeftParen) {
            self.parse_group()?
        } else {
            self.parse_comparison()?
        };

        // An even run of NOTs cancels out
        Ok(if nots % 2 == 1 { cond.negate() } else { cond })
    }

    /// Parses `"(" condition ")"`, enforcing [`MAX_NESTING_DEPTH`].
    fn parse_group(&mut self) -> ParseResult<Condition<E>> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::too_deep(MAX_NESTING_DEPTH, self.current.offset));
        }
        self.advance();

        self.depth += 1;
        let cond = self.parse_condition();
        self.depth -= 1;

        let cond = cond?;
        self.expect(TokenKind::RightParen)?;
        Ok(cond)
    }

    fn parse_comparison(&mut self) -> ParseResult<Condition<E>> {
        let call = self.parse_call()?;

        if let Some(op) = relational_op(self.current.kind) {
            self.advance();
            if self.check(TokenKind::Ident) {
                let right = self.parse_call()?;
                return Ok(Condition::CompareCalls(CompareWithCall::new(call, op, right)));
            }
            return Ok(match self.parse_literal()? {
                Literal::Int(n) => Condition::CompareInt(Compare::new(call, op, n)),
                Literal::Str(s) => Condition::CompareStr(Compare::new(call, op, s)),
            });
        }

        if self.check(TokenKind::In) {
            self.advance();
            if self.check(TokenKind::Ident) {
                let right = self.parse_call()?;
                return Ok(Condition::InCall(InWithCall::new(call, right)));
            }
            self.expect(TokenKind::LeftParen)?;
            return Ok(match self.parse_literal()? {
                Literal::Int(n) => {
                    let choices = self.parse_choices(n)?;
                    membership(call, choices, Condition::CompareInt, Condition::InInts)
                }
                Literal::Str(s) => {
                    let choices = self.parse_choices(s)?;
                    membership(call, choices, Condition::CompareStr, Condition::InStrs)
                }
            });
        }

        Ok(Condition::Call(call))
    }

    /// Parses the rest of an `IN` list after its first literal, through `)`.
    fn parse_choices<T: Operand>(&mut self, first: T) -> ParseResult<Vec<T>> {
        let mut choices = vec![first];
        while self.check(TokenKind::Comma) {
            self.advance();
            let (kind, offset) = (self.current.kind, self.current.offset);
            let choice = T::from_literal(self.parse_literal()?)
                .ok_or_else(|| ParseError::unexpected_token(kind, offset))?;
            choices.push(choice);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(choices)
    }

    /// Parses `identifier "(" literal ")"` and binds its accessor.
    fn parse_call(&mut self) -> ParseResult<Call<E>> {
        let ident = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LeftParen)?;
        let arg = self.parse_literal()?;
        self.expect(TokenKind::RightParen)?;

        let name = ident.text;
        match arg {
            Literal::Int(n) => match self.config.resolve_int(&name) {
                Some(method) => Ok(Call::with_int(name, n, method)),
                None => Err(self.no_such_method(name, LiteralKind::Int, ident.offset)),
            },
            Literal::Str(s) => match self.config.resolve_str(&name) {
                Some(method) => Ok(Call::with_str(name, s, method)),
                None => Err(self.no_such_method(name, LiteralKind::Str, ident.offset)),
            },
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Literal> {
        match self.current.kind {
            TokenKind::Int => {
                let token = self.advance();
                match decode_int(&token.text) {
                    Some(n) => Ok(Literal::Int(n)),
                    None => Err(ParseError::invalid_integer(token.text, token.offset)),
                }
            }
            TokenKind::Str => {
                let token = self.advance();
                Ok(Literal::Str(decode_string(&token.text)))
            }
            _ => Err(self.error_here()),
        }
    }

    fn no_such_method(&self, name: String, arg: LiteralKind, offset: usize) -> ParseError {
        let suggestion = self.config.suggest(&name, arg);
        ParseError::no_such_method(name, arg, suggestion, offset)
    }
}

fn relational_op(kind: TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Eq => Some(CompareOp::Eq),
        TokenKind::Ne => Some(CompareOp::Ne),
        TokenKind::Lt => Some(CompareOp::Lt),
        TokenKind::Le => Some(CompareOp::Le),
        TokenKind::Gt => Some(CompareOp::Gt),
        TokenKind::Ge => Some(CompareOp::Ge),
        _ => None,
    }
}

/// Builds a membership test, or an equality comparison for a single choice.
fn membership<E: ?Sized, T: Operand>(
    call: Call<E>,
    choices: Vec<T>,
    compare: fn(Compare<E, T>) -> Condition<E>,
    within: fn(Membership<E, T>) -> Condition<E>,
) -> Condition<E> {
    match <[T; 1]>::try_from(choices) {
        Ok([only]) => compare(Compare::new(call, CompareOp::Eq, only)),
        Err(choices) => within(Membership::new(call, choices)),
    }
}
