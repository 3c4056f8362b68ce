//! Error types for the post-processor.
//!
//! Only [`ConfigError`], [`ParseError`] and [`ExportError`] abort a run.
//! [`CommandError`] is absorbed by the emitter: the offending command is
//! logged and skipped.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::units::ConversionError;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors raised while reading a post-processor option string
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("unterminated quote in option string")]
    #[diagnostic(
        code(isel_post::config::unterminated_quote),
        help("close the quote opened at byte {offset}")
    )]
    UnterminatedQuote { offset: usize },

    #[error("invalid post-processor options: {message}")]
    #[diagnostic(code(isel_post::config::invalid))]
    Invalid { message: String },
}

// ============================================================================
// Per-command Errors
// ============================================================================

/// Errors that cause a single command to be skipped
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown command {opcode}")]
    #[diagnostic(code(isel_post::command::unsupported))]
    UnsupportedOpcode { opcode: String },

    #[error("{opcode} needs the {axis} position, but no move has set it yet")]
    #[diagnostic(
        code(isel_post::command::untracked_axis),
        help("move to an absolute position before issuing {opcode}")
    )]
    UntrackedAxis { opcode: String, axis: char },

    #[error("cannot convert parameter {code}")]
    #[diagnostic(code(isel_post::command::conversion))]
    Conversion {
        code: char,
        #[source]
        source: ConversionError,
    },
}

// ============================================================================
// G-code Text Errors
// ============================================================================

/// Errors raised while reading G-code text into commands
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("invalid number: {message}")]
    #[diagnostic(code(isel_post::parse::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("unexpected word")]
    #[diagnostic(
        code(isel_post::parse::unexpected_word),
        help("parameters are written as a letter followed by a number, e.g. X12.5")
    )]
    UnexpectedWord {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a parameter here")]
        span: SourceSpan,
    },

    #[error("unterminated comment")]
    #[diagnostic(code(isel_post::parse::unterminated_comment))]
    UnterminatedComment {
        #[source_code]
        src: NamedSource<String>,
        #[label("comment starts here")]
        span: SourceSpan,
    },
}

// ============================================================================
// Run-level Errors
// ============================================================================

/// Fatal errors for a whole export run
#[derive(Error, Diagnostic, Debug)]
pub enum ExportError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot write {path}")]
    #[diagnostic(code(isel_post::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
