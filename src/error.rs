//! Error types for the CMOS IC simulator.
//!
//! This module provides a unified error type [`IcError`] that covers
//! all error conditions that can occur during netlist parsing, circuit
//! construction, and signal resolution.

use thiserror::Error;

/// Result type alias using [`IcError`].
pub type Result<T> = std::result::Result<T, IcError>;

/// Unified error type for all CMOS IC operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    // ============ Construction Errors ============
    /// Invalid scheme entry, non-transistor key, duplicate or unknown name
    #[error("Construction error: {message}")]
    Construction { message: String },

    /// Fan-in/fan-out limit exceeded or direction forbidden by the node role
    #[error("Cannot connect {from} to {to}: {message}")]
    ConnectionLimit {
        from: String,
        to: String,
        message: String,
    },

    // ============ Resolution Errors ============
    /// A node that needs drivers has none
    #[error("{node} is not connected to any driver")]
    NotConnected { node: String },

    /// Two drivers force opposite levels onto one node
    #[error("Driver contention on {node}: both LOW and HIGH are driven")]
    DriverContention { node: String },

    // ============ Run-time Errors ============
    /// Unknown input name passed to a state change
    #[error("Wrong input name: \"{name}\". Expected one of: {expected:?}")]
    UnknownInputName { name: String, expected: Vec<String> },

    /// Raw signal value outside {-1, 0, 1}
    #[error("Signal accepts only -1, 0 or 1. Got: {value}")]
    InvalidSignalValue { value: String },

    /// Attempt to change a locked signal
    #[error("Trying to change locked signal")]
    LockedSignal,

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Failed to read netlist file '{path}': {message}")]
    FileReadError { path: String, message: String },
}

impl IcError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    /// Create a connection limit error
    pub fn connection_limit(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConnectionLimit {
            from: from.into(),
            to: to.into(),
            message: message.into(),
        }
    }

    /// Create an invalid signal value error
    pub fn invalid_signal(value: impl ToString) -> Self {
        Self::InvalidSignalValue {
            value: value.to_string(),
        }
    }
}
