//! Translation of a single command into ISEL lines.

use crate::config::Config;
use crate::drill;
use crate::error::CommandError;
use crate::mapper::{self, Mapping, VELOCITY};
use crate::modal::ModalState;
use crate::opcode::Opcode;
use crate::params;
use crate::toolpath::Command;

/// Translate one command into unnumbered output lines.
///
/// On error nothing is emitted and `modal` is left untouched. On success the
/// modal state is refreshed from the command's raw X/Y/Z/F values.
pub fn translate_command(
    command: &Command,
    modal: &mut ModalState,
    config: &Config,
) -> Result<Vec<String>, CommandError> {
    let opcode: Opcode = command.opcode.parse()?;
    let mapping = mapper::map(&opcode, config.output_comments);
    let Some(word) = mapping.word() else {
        return Ok(Vec::new());
    };

    let converted = params::convert(&command.opcode, &command.parameters, modal)?;

    let mut lines = Vec::new();
    if let Some(feed) = converted.feed {
        lines.push(format!("{VELOCITY} {feed}"));
    }

    match &mapping {
        Mapping::DrillDefine(cycle) => {
            lines.extend(drill::define_lines(*cycle, &converted.tokens, command)?);
        }
        Mapping::DrillExecute => {
            lines.push(drill::execute_line(&command.opcode, modal)?);
        }
        Mapping::Move(_) if converted.tokens.is_empty() => {}
        Mapping::ToolChange | Mapping::Line(_) | Mapping::Move(_) | Mapping::Comment(_) => {
            if matches!(mapping, Mapping::ToolChange) {
                lines.extend(non_empty_lines(&config.tool_change));
            }
            let mut parts: Vec<String> = vec![word.to_string()];
            parts.extend(mapping.modifiers().into_iter().map(String::from));
            parts.extend(converted.tokens.iter().map(ToString::to_string));
            lines.push(parts.join(" "));
        }
        Mapping::Suppressed => {}
    }

    modal.refresh(&command.parameters);
    Ok(lines)
}

/// Lines of a configured text block, skipping empty ones.
pub fn non_empty_lines(block: &str) -> impl Iterator<Item = String> + '_ {
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
}
