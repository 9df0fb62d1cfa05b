//! Lexer (tokenizer) for filter expressions.
//!
//! The lexer is lazy: [`Lexer::next_token`] scans exactly one token from the
//! cursor and never fails. Anything it cannot make sense of comes out as an
//! [`TokenKind::Illegal`] or [`TokenKind::UnterminatedStr`] token and is
//! rejected by the parser, which knows where it was in the grammar.

use std::fmt;

/// The kind of a token in a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ==================== Literals ====================
    /// Integer literal, e.g. `42` or `-7`.
    Int,

    /// Single-quoted string literal, quotes included in the token text.
    Str,

    /// String literal that ran to the end of the input without a closing quote.
    UnterminatedStr,

    /// Call name.
    Ident,

    // ==================== Keywords ====================
    /// The `AND` keyword (case-insensitive).
    And,

    /// The `OR` keyword (case-insensitive).
    Or,

    /// The `NOT` keyword (case-insensitive).
    Not,

    /// The `IN` keyword (case-insensitive).
    In,

    // ==================== Punctuation ====================
    /// Opening parenthesis `(`.
    LeftParen,

    /// Closing parenthesis `)`.
    RightParen,

    /// Comma `,`.
    Comma,

    // ==================== Relational Operators ====================
    /// `=`
    Eq,

    /// `<>`
    Ne,

    /// `<`
    Lt,

    /// `<=`
    Le,

    /// `>`
    Gt,

    /// `>=`
    Ge,

    /// A character that cannot start any token.
    Illegal,

    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Int => "integer literal",
            TokenKind::Str => "string literal",
            TokenKind::UnterminatedStr => "unterminated string literal",
            TokenKind::Ident => "identifier",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Eq => "'='",
            TokenKind::Ne => "'<>'",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Illegal => "illegal character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A token with its source text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The exact source text, e.g. `'a\'b'` for a string literal.
    pub text: String,
    /// Char offset where the token starts (0-indexed).
    pub offset: usize,
}

/// Lexer for tokenizing filter expressions.
pub struct Lexer {
    input: Vec<char>,
    /// Current char position in the input.
    position: usize,
}

impl Lexer {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Length of the input in chars; the offset reported for end of input.
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Builds a token spanning from `start` to the cursor.
    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.input[start..self.position].iter().collect(),
            offset: start,
        }
    }

    /// Consumes `len` chars and builds the token.
    fn single(&mut self, kind: TokenKind, start: usize, len: usize) -> Token {
        self.position += len;
        self.token(kind, start)
    }

    /// Reads the rest of an identifier whose first chars are already consumed.
    fn read_identifier(&mut self, start: usize) -> Token {
        while self.current_char().is_some_and(|c| is_ident_char(c, false)) {
            self.advance();
        }
        self.token(TokenKind::Ident, start)
    }

    /// Matches a keyword one letter at a time, falling back to an identifier
    /// as soon as the input diverges or keeps going (`Andrew`, `orders`).
    fn read_keyword(&mut self, start: usize, keyword: &str, kind: TokenKind) -> Token {
        for expected in keyword.chars() {
            match self.current_char() {
                Some(c) if c.eq_ignore_ascii_case(&expected) => self.advance(),
                _ => return self.read_identifier(start),
            }
        }
        if self.current_char().is_some_and(|c| is_ident_char(c, false)) {
            return self.read_identifier(start);
        }
        self.token(kind, start)
    }

    fn read_number(&mut self, start: usize) -> Token {
        if self.current_char() == Some('-') {
            self.advance();
        }
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.token(TokenKind::Int, start)
    }

    /// Reads a quoted string. `\` escapes whatever follows it; decoding is
    /// left to [`decode_string`].
    fn read_string(&mut self, start: usize) -> Token {
        self.advance(); // opening quote
        let mut escaping = false;
        while let Some(c) = self.current_char() {
            self.advance();
            if escaping {
                escaping = false;
            } else if c == '\\' {
                escaping = true;
            } else if c == '\'' {
                return self.token(TokenKind::Str, start);
            }
        }
        self.token(TokenKind::UnterminatedStr, start)
    }

    /// Scans the next token. Once the input is exhausted this keeps returning
    /// [`TokenKind::Eof`] tokens positioned at the end of the input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.current_char() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '(' => self.single(TokenKind::LeftParen, start, 1),
            ')' => self.single(TokenKind::RightParen, start, 1),
            ',' => self.single(TokenKind::Comma, start, 1),
            '=' => self.single(TokenKind::Eq, start, 1),
            '<' => match self.peek_char(1) {
                Some('=') => self.single(TokenKind::Le, start, 2),
                Some('>') => self.single(TokenKind::Ne, start, 2),
                _ => self.single(TokenKind::Lt, start, 1),
            },
            '>' => match self.peek_char(1) {
                Some('=') => self.single(TokenKind::Ge, start, 2),
                _ => self.single(TokenKind::Gt, start, 1),
            },

            // Keywords, or identifiers that merely start like one
            'a' | 'A' => self.read_keyword(start, "and", TokenKind::And),
            'o' | 'O' => self.read_keyword(start, "or", TokenKind::Or),
            'n' | 'N' => self.read_keyword(start, "not", TokenKind::Not),
            'i' | 'I' => self.read_keyword(start, "in", TokenKind::In),

            _ if is_ident_char(c, true) => {
                self.advance();
                self.read_identifier(start)
            }

            '\'' => self.read_string(start),

            _ if c.is_ascii_digit() => self.read_number(start),
            '-' if self.peek_char(1).is_some_and(|d| d.is_ascii_digit()) => {
                self.read_number(start)
            }

            _ => self.single(TokenKind::Illegal, start, 1),
        }
    }

    /// Collects all tokens up to, but not including, end of input.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.kind == TokenKind::Eof {
                return tokens;
            }
            tokens.push(token);
        }
    }
}

fn is_ident_char(c: char, first: bool) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || (!first && c.is_ascii_digit())
}

/// Decodes the text of a [`TokenKind::Str`] token.
///
/// Strips the surrounding quotes and resolves `\t`, `\n`, `\r` and `\'`; any
/// other escaped character stands for itself.
pub fn decode_string(text: &str) -> String {
    let inner = text.strip_prefix('\'').unwrap_or(text);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);

    let mut result = String::with_capacity(inner.len());
    let mut escaping = false;
    for c in inner.chars() {
        if escaping {
            result.push(match c {
                't' => '\t',
                'n' => '\n',
                'r' => '\r',
                other => other,
            });
            escaping = false;
        } else if c == '\\' {
            escaping = true;
        } else {
            result.push(c);
        }
    }
    result
}

/// Decodes the text of a [`TokenKind::Int`] token, `None` on overflow.
pub fn decode_int(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}
