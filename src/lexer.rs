//! Pull-based scanner for A64 assembly text.
//!
//! The lexer is a small state machine driven by [`Iterator::next`]: each call
//! runs states until one of them emits a token. The stream always ends with
//! either an `Eof` token or a single `Error` token, after which it yields
//! `None` forever.

use std::fmt;

use tracing::trace;

use crate::error::LexError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Register,
    Number,
    Comma,
    Newline,
    Eof,
    Error(LexError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token; the message for `Error` tokens.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    pub fn eof(line: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Error(_) => f.write_str(&self.text),
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Identifier,
    Number,
    Register,
    Done,
}

pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    line: usize,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            line: 1,
            state: State::Code,
        }
    }

    /// Line the cursor is currently on.
    pub fn line(&self) -> usize {
        self.line
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut rest = self.input[self.pos..].chars();
        rest.next();
        rest.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while self.peek().is_some_and(&pred) {
            self.bump();
            n += 1;
        }
        n
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }

    fn lexeme(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    fn emit(&mut self, kind: TokenKind) -> Token {
        let tok = Token {
            kind,
            text: self.lexeme().to_string(),
            line: self.line,
        };
        self.start = self.pos;
        tok
    }

    fn fail(&mut self, err: LexError) -> Token {
        self.state = State::Done;
        self.start = self.pos;
        Token {
            text: err.to_string(),
            kind: TokenKind::Error(err),
            line: self.line,
        }
    }

    /// Dispatch state. Returns `None` when it hands off to another state.
    fn lex_code(&mut self) -> Option<Token> {
        loop {
            let Some(c) = self.peek() else {
                self.state = State::Done;
                return Some(self.emit(TokenKind::Eof));
            };
            match c {
                '\n' => {
                    self.bump();
                    let tok = self.emit(TokenKind::Newline);
                    self.line += 1;
                    return Some(tok);
                }
                c if c.is_whitespace() => {
                    self.bump();
                    self.ignore();
                }
                ',' => {
                    self.bump();
                    return Some(self.emit(TokenKind::Comma));
                }
                '#' | '0'..='9' => {
                    self.state = State::Number;
                    return None;
                }
                'x' | 'X' | 'w' | 'W' => {
                    self.state = State::Register;
                    return None;
                }
                'v' | 'V' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                    self.state = State::Register;
                    return None;
                }
                c if c.is_alphabetic() => {
                    self.state = State::Identifier;
                    return None;
                }
                other => {
                    self.bump();
                    return Some(self.fail(LexError::UnrecognizedChar { ch: other }));
                }
            }
        }
    }

    fn lex_identifier(&mut self) -> Token {
        self.eat_while(char::is_alphanumeric);
        self.state = State::Code;
        self.emit(TokenKind::Identifier)
    }

    fn lex_number(&mut self) -> Token {
        if self.peek() == Some('#') {
            self.bump();
        }
        let digits = if self.peek() == Some('0') && matches!(self.peek_second(), Some('x' | 'X')) {
            self.bump();
            self.bump();
            self.eat_while(|c| c.is_ascii_hexdigit())
        } else {
            self.eat_while(|c| c.is_ascii_digit())
        };
        if digits == 0 {
            let lexeme = self.lexeme().to_string();
            return self.fail(LexError::MissingDigits { lexeme });
        }
        self.state = State::Code;
        self.emit(TokenKind::Number)
    }

    fn lex_register(&mut self) -> Token {
        let Some(prefix) = self.bump() else {
            return self.fail(LexError::UnrecognizedChar { ch: '\0' });
        };
        if self.eat_while(|c| c.is_ascii_digit()) == 0 {
            return self.fail(LexError::MissingRegisterDigit { prefix });
        }
        if matches!(prefix, 'v' | 'V') && self.peek() == Some('.') {
            self.bump();
            if self.eat_while(|c| c.is_ascii_alphanumeric()) == 0 {
                let lexeme = self.lexeme().to_string();
                return self.fail(LexError::MissingElementType { lexeme });
            }
        }
        self.state = State::Code;
        self.emit(TokenKind::Register)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let tok = match self.state {
                State::Done => return None,
                State::Code => self.lex_code(),
                State::Identifier => Some(self.lex_identifier()),
                State::Number => Some(self.lex_number()),
                State::Register => Some(self.lex_register()),
            };
            if let Some(tok) = tok {
                trace!(kind = ?tok.kind, text = %tok.text, line = tok.line, "token");
                return Some(tok);
            }
        }
    }
}
