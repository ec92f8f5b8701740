//! # Term Parser
//!
//! Recursive-descent parser over the tokens produced by [`crate::lexer`].
//! A document is a sequence of terms, each ended by a `.` terminator; this
//! is the format of templates, descriptors, and vars files alike.

use crate::atom::Atom;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::term::Term;

/// Deepest nesting of lists, tuples, and maps accepted in one term.
pub const MAX_DEPTH: usize = 256;

/// Parse every `.`-terminated term in `source`, in order.
///
/// An empty document (only whitespace and comments) yields an empty vector.
pub fn parse_terms(source: &str) -> ParseResult<Vec<Term>> {
    let mut parser = Parser::new(Lexer::new(source).tokenize()?);
    let mut terms = Vec::new();
    while !parser.at_eof() {
        terms.push(parser.term()?);
        parser.expect(TokenKind::Dot, "'.' after term")?;
    }
    Ok(terms)
}

/// Parse a document that contains exactly one `.`-terminated term.
pub fn parse_term(source: &str) -> ParseResult<Term> {
    let mut parser = Parser::new(Lexer::new(source).tokenize()?);
    if parser.at_eof() {
        let t = parser.current();
        return Err(ParseError::new("no term found", t.line, t.column));
    }
    let term = parser.term()?;
    parser.expect(TokenKind::Dot, "'.' after term")?;
    if !parser.at_eof() {
        let t = parser.current();
        return Err(ParseError::new(
            "expected a single term, found more",
            t.line,
            t.column,
        ));
    }
    Ok(term)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let t = self.current();
        ParseError::unexpected(expected, &t.kind.describe(), t.line, t.column)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<()> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn term(&mut self) -> ParseResult<Term> {
        let token = self.advance();
        let (line, column) = (token.line, token.column);
        match token.kind {
            TokenKind::Atom(a) => Ok(Term::Atom(Atom::new(a))),
            TokenKind::Integer(i) => Ok(Term::Integer(i)),
            TokenKind::Float(x) => Ok(Term::Float(x)),
            TokenKind::Str(s) => Ok(Term::String(self.adjacent_strings(s))),
            sign @ (TokenKind::Minus | TokenKind::Plus) => {
                let negate = sign == TokenKind::Minus;
                match self.advance().kind {
                    TokenKind::Integer(i) => Ok(Term::Integer(if negate { -i } else { i })),
                    TokenKind::Float(x) => Ok(Term::Float(if negate { -x } else { x })),
                    other => Err(ParseError::unexpected(
                        "number after sign",
                        &other.describe(),
                        token.line,
                        token.column,
                    )),
                }
            }
            TokenKind::LBrace => self.nested(line, column, |p| {
                p.sequence(&TokenKind::RBrace, "'}'").map(Term::Tuple)
            }),
            TokenKind::LBracket => self.nested(line, column, Self::list),
            TokenKind::BinOpen => self.nested(line, column, Self::binary),
            TokenKind::MapOpen => self.nested(line, column, Self::map),
            TokenKind::Var(name) => Err(ParseError::new(
                format!("variable {name} is not allowed in a literal term"),
                token.line,
                token.column,
            )),
            other => Err(ParseError::unexpected(
                "a term",
                &other.describe(),
                token.line,
                token.column,
            )),
        }
    }

    /// Run `parse` one level deeper than the opener at `line:column`.
    /// Fails past [`MAX_DEPTH`] instead of recursing further.
    fn nested(
        &mut self,
        line: usize,
        column: usize,
        parse: impl FnOnce(&mut Self) -> ParseResult<Term>,
    ) -> ParseResult<Term> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new("term nested too deeply", line, column));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// `"abc" "def"` is a single string.
    fn adjacent_strings(&mut self, mut text: String) -> String {
        while let TokenKind::Str(next) = &self.current().kind {
            text.push_str(next);
            self.advance();
        }
        text
    }

    /// Comma-separated terms up to `close`, which is consumed.
    fn sequence(&mut self, close: &TokenKind, expected: &str) -> ParseResult<Vec<Term>> {
        let mut items = Vec::new();
        if self.check(close) {
            self.advance();
            return Ok(items);
        }
        loop {
            items.push(self.term()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if self.check(close) {
                self.advance();
                return Ok(items);
            } else {
                return Err(self.unexpected(&format!("',' or {expected}")));
            }
        }
    }

    fn list(&mut self) -> ParseResult<Term> {
        let mut items = Vec::new();
        if self.check(&TokenKind::RBracket) {
            self.advance();
            return Ok(Term::List(items));
        }
        loop {
            items.push(self.term()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if self.check(&TokenKind::RBracket) {
                self.advance();
                return Ok(Term::List(items));
            } else if self.check(&TokenKind::Pipe) {
                let pipe = self.advance();
                match self.term()? {
                    Term::List(tail) => items.extend(tail),
                    _ => {
                        return Err(ParseError::new(
                            "improper lists are not supported",
                            pipe.line,
                            pipe.column,
                        ))
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                return Ok(Term::List(items));
            } else {
                return Err(self.unexpected("',', '|' or ']'"));
            }
        }
    }

    fn binary(&mut self) -> ParseResult<Term> {
        let mut text = String::new();
        if self.check(&TokenKind::BinClose) {
            self.advance();
            return Ok(Term::Binary(text));
        }
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Str(s) => text.push_str(&self.adjacent_strings(s)),
                other => {
                    return Err(ParseError::unexpected(
                        "string segment in binary",
                        &other.describe(),
                        token.line,
                        token.column,
                    ))
                }
            }
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                self.expect(TokenKind::BinClose, "',' or '>>'")?;
                return Ok(Term::Binary(text));
            }
        }
    }

    fn map(&mut self) -> ParseResult<Term> {
        let mut pairs = Vec::new();
        if self.check(&TokenKind::RBrace) {
            self.advance();
            return Ok(Term::Map(pairs));
        }
        loop {
            let key = self.term()?;
            self.expect(TokenKind::Arrow, "'=>'")?;
            let value = self.term()?;
            pairs.push((key, value));
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                self.expect(TokenKind::RBrace, "',' or '}'")?;
                return Ok(Term::Map(pairs));
            }
        }
    }
}
