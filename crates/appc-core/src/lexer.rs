//! Lexer for literal-term source text.

use crate::error::{ParseError, ParseResult};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare or quoted atom, unquoted.
    Atom(String),
    /// A variable name. Never valid in a literal term; kept for diagnostics.
    Var(String),
    /// An integer literal, including `$c` character literals.
    Integer(i64),
    /// A float literal.
    Float(f64),
    /// A double-quoted string, unescaped.
    Str(String),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `<<`
    BinOpen,
    /// `>>`
    BinClose,
    /// `#{`
    MapOpen,
    /// `=>`
    Arrow,
    /// The `.` that ends a term.
    Dot,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// How the token is named in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Atom(a) => format!("atom '{a}'"),
            TokenKind::Var(v) => format!("variable {v}"),
            TokenKind::Integer(i) => format!("integer {i}"),
            TokenKind::Float(x) => format!("float {x}"),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::BinOpen => "'<<'".to_string(),
            TokenKind::BinClose => "'>>'".to_string(),
            TokenKind::MapOpen => "'#{'".to_string(),
            TokenKind::Arrow => "'=>'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with the location of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

/// Converts source text into tokens.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line, self.column)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '%' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_trivia();
        let (line, column) = (self.line, self.column);
        let Some(c) = self.bump() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
                column,
            });
        };

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '|' => TokenKind::Pipe,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '<' if self.peek() == Some('<') => {
                self.bump();
                TokenKind::BinOpen
            }
            '>' if self.peek() == Some('>') => {
                self.bump();
                TokenKind::BinClose
            }
            '#' if self.peek() == Some('{') => {
                self.bump();
                TokenKind::MapOpen
            }
            '=' if self.peek() == Some('>') => {
                self.bump();
                TokenKind::Arrow
            }
            '.' => match self.peek() {
                None | Some('%') => TokenKind::Dot,
                Some(next) if next.is_whitespace() => TokenKind::Dot,
                Some(next) => {
                    return Err(ParseError::new(
                        format!("unexpected '.' before '{next}'"),
                        line,
                        column,
                    ))
                }
            },
            '"' => TokenKind::Str(self.quoted('"')?),
            '\'' => TokenKind::Atom(self.quoted('\'')?),
            '$' => TokenKind::Integer(self.char_literal()?),
            c if c.is_ascii_digit() => self.number(c)?,
            c if c.is_lowercase() => TokenKind::Atom(self.word(c)),
            c if c.is_uppercase() || c == '_' => TokenKind::Var(self.word(c)),
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{other}'"),
                    line,
                    column,
                ))
            }
        };
        Ok(Token { kind, line, column })
    }

    fn word(&mut self, first: char) -> String {
        let mut text = String::from(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '@' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    fn digits(&mut self, radix: u32, into: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_digit(radix) {
                into.push(c);
                self.bump();
            } else if c == '_' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn number(&mut self, first: char) -> ParseResult<TokenKind> {
        let mut text = String::from(first);
        self.digits(10, &mut text);

        if self.peek() == Some('#') {
            self.bump();
            let radix: u32 = text
                .parse()
                .ok()
                .filter(|r| (2..=36).contains(r))
                .ok_or_else(|| self.error(format!("invalid radix {text}")))?;
            let mut body = String::new();
            self.digits(radix, &mut body);
            return i64::from_str_radix(&body, radix)
                .map(TokenKind::Integer)
                .map_err(|_| self.error(format!("invalid base-{radix} integer '{body}'")));
        }

        // A '.' only continues the number when a digit follows; otherwise it
        // is the terminator.
        let mut lookahead = self.chars.clone();
        let is_float = lookahead.next() == Some('.')
            && lookahead.next().is_some_and(|c| c.is_ascii_digit());
        if !is_float {
            return text
                .parse()
                .map(TokenKind::Integer)
                .map_err(|_| self.error(format!("integer '{text}' out of range")));
        }

        self.bump();
        text.push('.');
        self.digits(10, &mut text);
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            text.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                text.push(sign);
            }
            let before = text.len();
            self.digits(10, &mut text);
            if text.len() == before {
                return Err(self.error("missing exponent digits"));
            }
        }
        text.parse()
            .map(TokenKind::Float)
            .map_err(|_| self.error(format!("invalid float '{text}'")))
    }

    fn quoted(&mut self, delimiter: char) -> ParseResult<String> {
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated quoted text")),
                Some(c) if c == delimiter => return Ok(text),
                Some('\\') => text.push(self.escape()?),
                Some(c) => text.push(c),
            }
        }
    }

    fn char_literal(&mut self) -> ParseResult<i64> {
        match self.bump() {
            None => Err(self.error("missing character after '$'")),
            Some('\\') => Ok(self.escape()? as i64),
            Some(c) => Ok(c as i64),
        }
    }

    fn escape(&mut self) -> ParseResult<char> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        let decoded = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            's' => ' ',
            'e' => '\u{1b}',
            'd' => '\u{7f}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                return self.code_point(code);
            }
            'x' => {
                let mut hex = String::new();
                if self.peek() == Some('{') {
                    self.bump();
                    while let Some(d) = self.peek().filter(|d| *d != '}') {
                        hex.push(d);
                        self.bump();
                    }
                    if self.bump() != Some('}') {
                        return Err(self.error("unterminated \\x{...} escape"));
                    }
                } else {
                    for _ in 0..2 {
                        if let Some(d) = self.peek().filter(char::is_ascii_hexdigit) {
                            hex.push(d);
                            self.bump();
                        }
                    }
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| self.error(format!("invalid hex escape '{hex}'")))?;
                return self.code_point(code);
            }
            '^' => {
                let Some(ctrl) = self.bump() else {
                    return Err(self.error("unterminated control escape"));
                };
                return self.code_point(ctrl as u32 & 0x1f);
            }
            other => other,
        };
        Ok(decoded)
    }

    fn code_point(&self, code: u32) -> ParseResult<char> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {code}")))
    }
}
