//! Parser for netlists.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::circuit::Designator;
use crate::error::{IcError, Result};

/// Parser for netlists.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peeked: Option<Token>,
    /// Cascade opened by `.cascade` and not yet closed by `.ends`
    open: Option<CascadeDef>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
            peeked: None,
            open: None,
        }
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let line = self.current.line;
                    let transistor = self.parse_transistor()?;
                    let cascade = self.open.as_mut().ok_or_else(|| {
                        IcError::parse(line, "transistor outside of a .cascade block")
                    })?;
                    cascade.transistors.push(transistor);
                }
                _ => {
                    return Err(IcError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
            self.end_of_line()?;
        }

        if let Some(cascade) = &self.open {
            return Err(IcError::parse(
                cascade.line,
                format!("cascade {} is missing .ends", cascade.name),
            ));
        }
        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(())
    }

    fn peek_kind(&mut self) -> Result<TokenKind> {
        if let Some(tok) = &self.peeked {
            return Ok(tok.kind);
        }
        let tok = self.lexer.next_token()?;
        let kind = tok.kind;
        self.peeked = Some(tok);
        Ok(kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(IcError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(IcError::parse(
                self.current.line,
                format!("unexpected {:?} at end of line", self.current.text),
            )),
        }
    }

    /// Identifiers up to the end of the line.
    fn identifiers(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        while self.current.kind == TokenKind::Identifier {
            names.push(self.expect(TokenKind::Identifier)?.text);
        }
        Ok(names)
    }

    fn number(&mut self) -> Result<u32> {
        let tok = self.expect(TokenKind::Number)?;
        tok.text
            .parse()
            .map_err(|_| IcError::parse(tok.line, format!("number out of range: {}", tok.text)))
    }

    fn parse_directive(&mut self, ast: &mut CircuitAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".ic" => {
                if ast.name.is_some() {
                    return Err(IcError::parse(line, "circuit name given twice"));
                }
                ast.name = Some(self.expect(TokenKind::Identifier)?.text);
            }
            ".input" | ".output" => {
                self.top_level(&directive, line)?;
                let names = self.identifiers()?;
                if names.is_empty() {
                    return Err(IcError::parse(
                        line,
                        format!("{} needs at least one name", directive),
                    ));
                }
                if directive.eq_ignore_ascii_case(".input") {
                    ast.inputs.extend(names);
                } else {
                    ast.outputs.extend(names);
                }
            }
            ".cascade" => {
                self.top_level(&directive, line)?;
                let name = self.expect(TokenKind::Identifier)?.text;
                if ast.cascade(&name).is_some() {
                    return Err(IcError::parse(line, format!("duplicate cascade {}", name)));
                }
                self.open = Some(CascadeDef {
                    name,
                    inputs: Vec::new(),
                    transistors: Vec::new(),
                    line,
                });
            }
            ".in" => {
                let name = self.expect(TokenKind::Identifier)?.text;
                let mut numbers = vec![self.number()?];
                while self.current.kind == TokenKind::Number {
                    numbers.push(self.number()?);
                }
                let cascade = self
                    .open
                    .as_mut()
                    .ok_or_else(|| IcError::parse(line, ".in outside of a .cascade block"))?;
                cascade.inputs.push(StageInputDef {
                    name,
                    numbers,
                    line,
                });
            }
            ".ends" => {
                let cascade = self
                    .open
                    .take()
                    .ok_or_else(|| IcError::parse(line, ".ends without .cascade"))?;
                ast.cascades.push(cascade);
            }
            ".link" => {
                self.top_level(&directive, line)?;
                let from = self.expect(TokenKind::Identifier)?.text;
                self.expect(TokenKind::Arrow)?;
                let targets = self.identifiers()?;
                if targets.is_empty() {
                    return Err(IcError::parse(line, format!("link from {} has no targets", from)));
                }
                ast.links.push(LinkDef {
                    from,
                    targets,
                    line,
                });
            }
            _ => {
                return Err(IcError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn top_level(&self, directive: &str, line: usize) -> Result<()> {
        match &self.open {
            Some(cascade) => Err(IcError::parse(
                line,
                format!("{} inside cascade {}", directive, cascade.name),
            )),
            None => Ok(()),
        }
    }

    fn designator(&mut self) -> Result<Designator> {
        let tok = self.expect(TokenKind::Identifier)?;
        tok.text
            .parse()
            .map_err(|_| IcError::parse(tok.line, format!("'{}' is not a transistor", tok.text)))
    }

    fn parse_transistor(&mut self) -> Result<TransistorDef> {
        let line = self.current.line;
        let designator = self.designator()?;

        // A bare identifier not followed by '=' names the gate input.
        let mut gate = None;
        if self.current.kind == TokenKind::Identifier && self.peek_kind()? != TokenKind::Equals {
            gate = Some(self.expect(TokenKind::Identifier)?.text);
        }

        let mut width = None;
        let mut length = None;
        while self.current.kind == TokenKind::Identifier {
            let param = self.expect(TokenKind::Identifier)?.text;
            self.expect(TokenKind::Equals)?;
            let value = self.number()?;
            let slot = match param.to_lowercase().as_str() {
                "w" | "width" => &mut width,
                "l" | "length" => &mut length,
                _ => {
                    return Err(IcError::parse(
                        line,
                        format!("unknown transistor parameter: {}", param),
                    ));
                }
            };
            if slot.replace(value).is_some() {
                return Err(IcError::parse(line, format!("parameter {} given twice", param)));
            }
        }

        let mut downstream = Vec::new();
        if self.current.kind == TokenKind::Arrow {
            self.advance()?;
            while self.current.kind == TokenKind::Identifier {
                downstream.push(self.designator()?);
            }
            if downstream.is_empty() {
                return Err(IcError::parse(
                    line,
                    format!("{} has an arrow but no downstream transistors", designator),
                ));
            }
        }

        Ok(TransistorDef {
            designator,
            gate,
            width,
            length,
            downstream,
            line,
        })
    }
}
