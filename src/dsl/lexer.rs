//! Lexer (tokenizer) for netlists.

use crate::error::{IcError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A name: input, output, cascade, transistor or `STAGE.input`
    Identifier,
    /// An unsigned integer
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Arrow '->'
    Arrow,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '.' => {
                self.advance();
                let name = self.read_while(|c| c.is_alphanumeric() || c == '_');
                if name.is_empty() {
                    return Err(IcError::lexer(line, column, "empty directive"));
                }
                Ok(token(TokenKind::Directive, format!(".{}", name)))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '-' => {
                self.advance();
                if self.chars.peek() == Some(&'>') {
                    self.advance();
                    Ok(token(TokenKind::Arrow, "->".to_string()))
                } else {
                    Err(IcError::lexer(line, column, "expected '->'"))
                }
            }
            '0'..='9' => {
                let text = self.read_while(|c| c.is_ascii_digit());
                if self.chars.peek().is_some_and(|c| c.is_alphabetic() || *c == '_') {
                    return Err(IcError::lexer(
                        line,
                        column,
                        format!("identifier cannot start with a digit: '{}'", text),
                    ));
                }
                Ok(token(TokenKind::Number, text))
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
                if text.ends_with('.') {
                    return Err(IcError::lexer(
                        line,
                        column,
                        format!("dangling '.' in '{}'", text),
                    ));
                }
                Ok(token(TokenKind::Identifier, text))
            }
            _ => Err(IcError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}
