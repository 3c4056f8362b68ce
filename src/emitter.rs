//! Program assembly: header, operations and footer around the translated
//! command stream.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::lineno::{LineNumberer, OutputLine};
use crate::mapper::COMMENT;
use crate::modal::ModalState;
use crate::toolpath::{Operation, ToolpathNode};
use crate::translate::{non_empty_lines, translate_command};
use crate::units::SPEED_UNIT;

/// First line of every program
pub const BANNER: &str = "IMF_PBL_V1.0";

/// Machine reported when the host has no job record
pub const DEFAULT_MACHINE: &str = "ISEL - ICP 4030 (default)";

/// Name reported in the program header
pub const POST_PROCESSOR: &str = "isel_post";

/// State of one translation run.
///
/// Modal state and line numbers carry over from one operation to the next
/// and are dropped with the emitter.
#[derive(Debug)]
pub struct Emitter<'a> {
    config: &'a Config,
    modal: ModalState,
    numbers: LineNumberer,
    lines: Vec<OutputLine>,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            modal: ModalState::new(),
            numbers: LineNumberer::new(),
            lines: Vec::new(),
        }
    }

    /// Number and record one line.
    pub fn emit(&mut self, text: impl Into<String>) {
        let number = self.numbers.advance();
        self.lines.push(OutputLine {
            number,
            text: text.into(),
        });
    }

    /// Informational `;-` comment, dropped when comments are disabled.
    fn note(&mut self, text: impl AsRef<str>) {
        if self.config.output_comments {
            self.emit(format!("{COMMENT}- {}", text.as_ref()));
        }
    }

    fn block(&mut self, block: &str) {
        for line in non_empty_lines(block) {
            self.emit(line);
        }
    }

    /// Banner, export details and preamble.
    pub fn header(&mut self, generated_at: NaiveDateTime) {
        self.emit(BANNER);
        self.note(concat!("Exported by ", env!("CARGO_PKG_NAME")));
        self.note(format!("Post Processor: {POST_PROCESSOR}"));
        self.note(format!(
            "Output Time:{}",
            generated_at.format("%Y-%m-%d %H:%M:%S%.6f")
        ));

        self.note("begin preamble");
        let config = self.config;
        self.block(&config.preamble);
        self.note("finish preamble");
    }

    /// One top-level toolpath object with its per-operation wrapping.
    pub fn operation(&mut self, operation: &Operation) {
        let job = operation.job.as_ref();
        let machine = job
            .and_then(|job| job.machine.as_deref())
            .unwrap_or(DEFAULT_MACHINE);
        if let Some(units) = job.and_then(|job| job.machine_units.as_deref()) {
            // only the ISEL units (µm and µm/s) are produced
            warn!(
                operation = %operation.label,
                "unknown parameter 'MachineUnits: {units}', using {SPEED_UNIT}"
            );
        }

        let config = self.config;
        self.note(format!("begin operation: {}", operation.label));
        self.note(format!("machine: {machine}"));
        self.note(format!("unit system: {SPEED_UNIT}"));
        self.block(&config.pre_operation);

        self.node(&operation.root);

        self.note(format!("finish operation: {}", operation.label));
        self.block(&config.post_operation);
    }

    fn node(&mut self, node: &ToolpathNode) {
        let label = node.label();
        match node {
            ToolpathNode::Group { children, .. } => {
                debug!(group = %label, children = children.len(), "walking group");
                for child in children {
                    self.node(child);
                }
            }
            ToolpathNode::Path { commands, .. } => {
                debug!(path = %label, commands = commands.len(), "translating path");
                for command in commands {
                    match translate_command(command, &mut self.modal, self.config) {
                        Ok(lines) => {
                            for line in lines {
                                self.emit(line);
                            }
                        }
                        Err(e) => warn!(path = %label, "{e}, skipping..."),
                    }
                }
            }
            ToolpathNode::Other { .. } => {
                debug!(node = %label, "not a path, nothing to translate");
            }
        }
    }

    /// Postamble after the last operation.
    pub fn footer(&mut self) {
        let config = self.config;
        self.note("begin postamble");
        self.block(&config.postamble);
        self.note("finish postamble");
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    /// Assemble the program text, one terminated line per output line.
    pub fn finish(self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.to_string());
            text.push('\n');
        }
        text
    }
}

/// Translate a whole run into program text.
pub fn translate_program(
    operations: &[Operation],
    config: &Config,
    generated_at: NaiveDateTime,
) -> String {
    info!(operations = operations.len(), "postprocessing...");
    let mut emitter = Emitter::new(config);
    emitter.header(generated_at);
    for operation in operations {
        emitter.operation(operation);
    }
    emitter.footer();
    info!(lines = emitter.numbers.count(), "done postprocessing");
    emitter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolpath::{Command, Job};
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn quiet() -> Config {
        Config {
            output_comments: false,
            preamble: String::new(),
            postamble: String::new(),
            ..Config::default()
        }
    }

    #[test]
    fn numbering_skips_nothing_and_wastes_nothing() {
        let config = quiet();
        let operation = Operation::new(
            "op",
            ToolpathNode::path(
                "op",
                vec![
                    Command::new("G0").param('X', 1.0),
                    Command::new("G91").param('X', 2.0),
                    Command::new("(dropped)"),
                    Command::new("G1").param('X', 3.0),
                ],
            ),
        );
        let mut emitter = Emitter::new(&config);
        emitter.header(noon());
        emitter.operation(&operation);
        emitter.footer();

        let numbers: Vec<u32> = emitter.lines().iter().map(|l| l.number).collect();
        assert_eq!(numbers, [0, 1, 2]);
        assert_eq!(emitter.numbers.count(), 3);
        assert_eq!(
            emitter.finish(),
            "N000000 IMF_PBL_V1.0\nN000001 FASTABS X1000\nN000002 MOVEABS X3000\n"
        );
    }

    #[test]
    fn nested_groups_are_walked_in_order() {
        let config = quiet();
        let root = ToolpathNode::group(
            "job",
            vec![
                ToolpathNode::path("a", vec![Command::new("G0").param('Z', 5.0)]),
                ToolpathNode::Other {
                    label: "Stock".to_string(),
                },
                ToolpathNode::group(
                    "inner",
                    vec![ToolpathNode::path("b", vec![Command::new("G1").param('Z', 1.0)])],
                ),
            ],
        );
        let mut emitter = Emitter::new(&config);
        emitter.operation(&Operation::new("job", root));
        let texts: Vec<&str> = emitter.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["FASTABS Z5000", "MOVEABS Z1000"]);
    }

    #[test]
    fn modal_state_spans_operations() {
        let config = quiet();
        let first = Operation::new(
            "first",
            ToolpathNode::path("first", vec![Command::new("G0").param('X', 10.0).param('Y', 20.0)]),
        );
        let second = Operation::new(
            "second",
            ToolpathNode::path("second", vec![Command::new("G81").param('Z', -2.0), Command::new("G80")]),
        );
        let mut emitter = Emitter::new(&config);
        emitter.operation(&first);
        emitter.operation(&second);
        let texts: Vec<&str> = emitter.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            ["FASTABS X10000 Y20000", "DRILLDEF C1", "DRILLDEF D2000", "DRILL X10000 Y20000"]
        );
    }

    #[test]
    fn operation_wrapping_with_comments() {
        let config = Config {
            pre_operation: "SPINDLE CW\n".to_string(),
            post_operation: "SPINDLE OFF".to_string(),
            ..Config::default()
        };
        let operation = Operation::new("Drilling", ToolpathNode::path("Drilling", vec![])).with_job(Job {
            machine: Some("ICP 4030".to_string()),
            machine_units: Some("Metric".to_string()),
        });
        let mut emitter = Emitter::new(&config);
        emitter.operation(&operation);
        let texts: Vec<&str> = emitter.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                ";- begin operation: Drilling",
                ";- machine: ICP 4030",
                ";- unit system: mm/min",
                "SPINDLE CW",
                ";- finish operation: Drilling",
                "SPINDLE OFF",
            ]
        );
    }
}
