//! HQL tokenizer implementation.

use super::{NumberKind, Span, Token, TokenKind};

/// A lexer that tokenizes HQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments. Returns an error token for a block
    /// comment left open at end of input.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* block comment */
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => return Some(self.error("Unterminated block comment")),
                        _ => {}
                    }
                }
                continue;
            }

            return None;
        }
    }

    /// Creates a span from start to current position.
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans a bare word.
    fn scan_word(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }
        Token::word(&self.input[self.start..self.pos], self.make_span())
    }

    /// Scans a backtick-quoted identifier.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance(); // opening backtick
        let content_start = self.pos;
        loop {
            match self.peek() {
                Some('`') => break,
                Some(_) => {
                    self.advance();
                }
                None => return self.error("Unterminated quoted identifier"),
            }
        }
        let content = String::from(&self.input[content_start..self.pos]);
        self.advance(); // closing backtick
        self.make_token(TokenKind::QuotedIdentifier(content))
    }

    /// Scans a number: decimal, exponent, hex, and the HQL type suffixes.
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('0') && matches!(self.peek_next(), Some('x' | 'X')) {
            self.advance();
            self.advance();
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                return self.error("Invalid hexadecimal literal");
            }
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            if matches!(self.peek(), Some('l' | 'L')) {
                self.advance();
            }
            return self.number(NumberKind::Hex);
        }

        let mut is_decimal = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // `1.5`, and also `1.` unless a path or another dot follows.
        let fraction = self.peek() == Some('.')
            && !self
                .peek_next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$' || c == '.' || c == '`');
        if fraction {
            is_decimal = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let mut lookahead = self.input[self.pos..].chars().skip(1);
            let exponent_follows = match lookahead.next() {
                Some('+' | '-') => lookahead.next().is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_follows {
                is_decimal = true;
                self.advance();
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        let suffix_kind = match (self.peek(), self.peek_next()) {
            (Some('b' | 'B'), Some('i' | 'I')) if !is_decimal => Some((NumberKind::BigInteger, 2)),
            (Some('b' | 'B'), Some('d' | 'D')) => Some((NumberKind::BigDecimal, 2)),
            (Some('l' | 'L'), _) if !is_decimal => Some((NumberKind::Long, 1)),
            (Some('f' | 'F'), _) => Some((NumberKind::Float, 1)),
            (Some('d' | 'D'), _) => Some((NumberKind::Double, 1)),
            _ => None,
        };

        let kind = match suffix_kind {
            Some((kind, len)) => {
                // A suffix only counts when it ends the word: `1day` is not `1d` + `ay`.
                let after = self.input[self.pos..].chars().nth(len);
                if after.is_some_and(|c| c.is_alphanumeric() || c == '_') {
                    return self.error("Invalid numeric literal");
                }
                for _ in 0..len {
                    self.advance();
                }
                kind
            }
            None if is_decimal => NumberKind::Double,
            None => NumberKind::Integer,
        };

        if self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.advance();
            }
            return self.error("Invalid numeric literal");
        }

        self.number(kind)
    }

    fn number(&self, kind: NumberKind) -> Token {
        self.make_token(TokenKind::Number {
            lexeme: String::from(&self.input[self.start..self.pos]),
            kind,
        })
    }

    /// Scans a string literal delimited by `quote`; a doubled quote escapes it.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return self.error("Unterminated string literal"),
            }
        }

        self.advance(); // closing quote
        self.make_token(TokenKind::String(value))
    }

    /// Scans a binary literal (X'...' or x'...').
    fn scan_binary(&mut self) -> Token {
        self.advance(); // X/x
        self.advance(); // opening quote

        let mut bytes = Vec::new();
        let mut hex_chars = String::new();

        loop {
            match self.peek() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => {
                    hex_chars.push(c);
                    self.advance();
                    if hex_chars.len() == 2 {
                        if let Ok(byte) = u8::from_str_radix(&hex_chars, 16) {
                            bytes.push(byte);
                        }
                        hex_chars.clear();
                    }
                }
                Some(_) => {
                    self.advance();
                    return self.error("Invalid character in binary literal");
                }
                None => return self.error("Unterminated binary literal"),
            }
        }

        if !hex_chars.is_empty() {
            self.advance();
            return self.error("Odd number of hex digits in binary literal");
        }

        self.advance(); // closing quote
        self.make_token(TokenKind::Binary(bytes))
    }

    /// Scans a `#{...}` template, honouring nested braces.
    fn scan_spel(&mut self) -> Token {
        self.advance(); // #
        self.advance(); // {
        let content_start = self.pos;
        let mut depth = 1usize;
        loop {
            match self.peek() {
                Some('{') => depth += 1,
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {}
                None => return self.error("Unterminated expression template"),
            }
            self.advance();
        }
        let content = String::from(&self.input[content_start..self.pos]);
        self.advance(); // closing }
        self.make_token(TokenKind::Spel(content))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' | '"' => return self.scan_string(c),
            '`' => return self.scan_quoted_identifier(),
            '#' if self.peek_next() == Some('{') => return self.scan_spel(),
            'X' | 'x' if self.peek_next() == Some('\'') => return self.scan_binary(),
            '.' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => {
                return self.scan_number();
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '$' => return self.scan_word(),
            _ => {}
        }

        self.advance();
        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ',' => self.make_token(TokenKind::Comma),
            '.' => self.make_token(TokenKind::Dot),
            ';' => self.make_token(TokenKind::Semicolon),
            ':' => self.make_token(TokenKind::Colon),
            '?' => self.make_token(TokenKind::Question),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '=' => self.make_token(TokenKind::Eq),
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                } else if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' | '^' if self.peek() == Some('=') => {
                self.advance();
                self.make_token(TokenKind::NotEq)
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                self.make_token(TokenKind::Concat)
            }
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
