//! Parameter ordering and conversion into ISEL tokens.

use std::fmt;

use tracing::{debug, warn};

use crate::error::CommandError;
use crate::modal::ModalState;
use crate::toolpath::Parameters;
use crate::units::{self, ConversionError};

/// Emission order of parameter codes. Codes not listed go last.
pub const PRIORITY: [char; 13] = [
    'I', 'J', 'X', 'Y', 'Z', 'A', 'B', 'C', 'F', 'S', 'T', 'Q', 'R',
];

fn rank(code: char) -> usize {
    PRIORITY
        .iter()
        .position(|&known| known == code)
        .unwrap_or(PRIORITY.len())
}

/// Parameters in emission order. Unknown codes keep their source order.
pub fn ordered(parameters: &Parameters) -> Vec<(char, f64)> {
    let mut ordered: Vec<(char, f64)> = parameters.iter().map(|(&c, &v)| (c, v)).collect();
    // sort_by_key is stable
    ordered.sort_by_key(|&(code, _)| rank(code));
    ordered
}

/// One inline token of an ISEL command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Absolute `X`, `Y` or `Z` target in µm
    Axis(char, i64),
    /// Absolute arc center `I` or `J` in µm
    Center(char, i64),
    /// Backtrack distance between pecks, `R`
    Backtrack(i64),
    /// First incremental feed, `F`
    FirstFeed(i64),
    /// Following incremental feeds, `O`
    NextFeed(i64),
    /// Bare tool number
    Tool(i64),
    /// Spindle speed, `RPM n`
    Speed(i64),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Axis(code, v) | Token::Center(code, v) => write!(f, "{code}{v}"),
            Token::Backtrack(v) => write!(f, "R{v}"),
            Token::FirstFeed(v) => write!(f, "F{v}"),
            Token::NextFeed(v) => write!(f, "O{v}"),
            Token::Tool(v) => write!(f, "{v}"),
            Token::Speed(v) => write!(f, "RPM {v}"),
        }
    }
}

/// Result of converting a command's parameters
#[derive(Debug, Default, PartialEq)]
pub struct Converted {
    /// New feed rate in µm/s, emitted as its own `VEL` line
    pub feed: Option<i64>,
    pub tokens: Vec<Token>,
}

fn convert_with(
    code: char,
    value: f64,
    rule: fn(f64) -> Result<i64, ConversionError>,
) -> Result<i64, CommandError> {
    rule(value).map_err(|source| CommandError::Conversion { code, source })
}

/// Convert parameters against the modal state as it was before this command.
///
/// The state is only read here; refreshing it is the caller's job once the
/// whole command has been translated.
pub fn convert(
    opcode: &str,
    parameters: &Parameters,
    modal: &ModalState,
) -> Result<Converted, CommandError> {
    let mut converted = Converted::default();

    for (code, value) in ordered(parameters) {
        debug!(code = %code, value, "processing parameter");
        match code {
            'F' => {
                if modal.is_unchanged('F', value) {
                    continue;
                }
                let feed = convert_with(code, value, units::velocity)?;
                if feed > 0 {
                    converted.feed = Some(feed);
                }
            }
            'I' | 'J' => {
                // offsets are relative to the current position
                let axis = if code == 'I' { 'X' } else { 'Y' };
                let origin = modal.get(axis).ok_or_else(|| CommandError::UntrackedAxis {
                    opcode: opcode.to_string(),
                    axis,
                })?;
                let center = convert_with(code, origin + value, units::length)?;
                converted.tokens.push(Token::Center(code, center));
            }
            'R' => {
                let backtrack = convert_with(code, value, units::length)?;
                converted.tokens.push(Token::Backtrack(backtrack));
            }
            'Q' => {
                let feed = convert_with(code, value, units::length)?;
                converted.tokens.push(Token::FirstFeed(feed));
                converted.tokens.push(Token::NextFeed(feed));
            }
            'X' | 'Y' | 'Z' => {
                if modal.is_unchanged(code, value) {
                    continue;
                }
                let position = convert_with(code, value, units::length)?;
                converted.tokens.push(Token::Axis(code, position));
            }
            'T' => {
                let tool = convert_with(code, value, units::natural)?;
                converted.tokens.push(Token::Tool(tool));
            }
            'S' => {
                let speed = convert_with(code, value, units::natural)?;
                converted.tokens.push(Token::Speed(speed));
            }
            'A' | 'B' | 'C' | 'K' => {
                warn!(code = %code, value, "parameter {code} is not yet implemented, skipping");
            }
            _ => {
                warn!(code = %code, value, "skipping unknown parameter {code}");
            }
        }
    }

    Ok(converted)
}
