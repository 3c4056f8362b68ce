//! Drilling cycle fusion.
//!
//! A cycle is split over two commands. The define command (G81, G82, G83)
//! carries the cutting parameters and becomes a series of `DRILLDEF` lines.
//! The execute command (G80) becomes a single `DRILL` line at whatever XY
//! position the modal state holds at that point.

use crate::error::CommandError;
use crate::mapper::{DRILL, DRILL_DEFINE};
use crate::modal::ModalState;
use crate::opcode::DrillCycle;
use crate::params::Token;
use crate::toolpath::Command;
use crate::units;

/// `DRILLDEF` lines for a cycle definition.
///
/// XY targets are left to the execute command. The Z target becomes a
/// positive depth `D`.
pub fn define_lines(
    cycle: DrillCycle,
    tokens: &[Token],
    command: &Command,
) -> Result<Vec<String>, CommandError> {
    let mut lines = vec![format!("{DRILL_DEFINE} {}", cycle.literal())];

    for token in tokens {
        let option = match token {
            Token::Axis('X' | 'Y', _) => continue,
            Token::Axis('Z', _) => {
                let Some(z) = command.get('Z') else {
                    continue;
                };
                let depth = units::length(-z)
                    .map_err(|source| CommandError::Conversion { code: 'Z', source })?;
                format!("D{depth}")
            }
            other => other.to_string(),
        };
        lines.push(format!("{DRILL_DEFINE} {option}"));
    }

    Ok(lines)
}

/// The `DRILL` line, positioned from the tracked X and Y.
pub fn execute_line(opcode: &str, modal: &ModalState) -> Result<String, CommandError> {
    let position = |axis: char| -> Result<i64, CommandError> {
        let value = modal.get(axis).ok_or_else(|| CommandError::UntrackedAxis {
            opcode: opcode.to_string(),
            axis,
        })?;
        units::length(value).map_err(|source| CommandError::Conversion { code: axis, source })
    };

    Ok(format!("{DRILL} X{} Y{}", position('X')?, position('Y')?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_drops_xy_and_turns_z_into_depth() {
        let cmd = Command::new("G81").param('X', 10.0).param('Z', -5.0).param('R', 2.0);
        let tokens = [
            Token::Axis('X', 10000),
            Token::Axis('Z', -5000),
            Token::Backtrack(2000),
        ];
        let lines = define_lines(DrillCycle::Simple, &tokens, &cmd).unwrap();
        assert_eq!(lines, ["DRILLDEF C1", "DRILLDEF D5000", "DRILLDEF R2000"]);
    }

    #[test]
    fn define_without_parameters_still_names_the_cycle() {
        let lines = define_lines(DrillCycle::Dwell, &[], &Command::new("G82")).unwrap();
        assert_eq!(lines, ["DRILLDEF C3"]);
    }

    #[test]
    fn execute_uses_tracked_position() {
        let modal = ModalState {
            x: Some(10.0),
            y: Some(20.0),
            z: Some(-5.0),
            feed: None,
        };
        assert_eq!(execute_line("G80", &modal).unwrap(), "DRILL X10000 Y20000");
    }

    #[test]
    fn execute_needs_a_position() {
        let modal = ModalState {
            x: Some(1.0),
            ..ModalState::default()
        };
        assert_eq!(
            execute_line("G80", &modal),
            Err(CommandError::UntrackedAxis {
                opcode: "G80".to_string(),
                axis: 'Y'
            })
        );
    }
}
