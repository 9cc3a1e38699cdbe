//! Netlist language for CMOS integrated circuits.
//!
//! A netlist is line-oriented and human-editable. It declares the IC's
//! inputs and outputs, one block per cascade listing its transistors and
//! how their drains feed each other, and the links that route each cascade
//! output onward.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | transistor | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".ic" name
//!             | (".input" | ".output") name+
//!             | ".cascade" name
//!             | ".in" name number+
//!             | ".ends"
//!             | ".link" name "->" target+
//! transistor  = designator [gate] { param } ["->" designator+]
//!
//! designator  = ['T'] ('P' | 'N' | 'p' | 'n') digit+
//! gate        = name                      top-level input
//! param       = ("w" | "l") '=' number    channel width / length
//! target      = name | name '.' name      output or STAGE.input
//! ```
//!
//! A transistor line without an arrow drains into the cascade output.
//! Sources that nothing feeds are tied to the rail of the transistor's
//! polarity.
//!
//! # Example
//!
//! ```text
//! # Inverter
//! .input A
//! .output Q
//!
//! .cascade INV
//! P1 A
//! N1 A
//! .ends
//!
//! .link INV -> Q
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::IcError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse(&content)
}
