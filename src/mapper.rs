//! Opcode to ISEL command mapping.

use crate::opcode::{DrillCycle, Opcode};

/// Command word of the cycle definition lines
pub const DRILL_DEFINE: &str = "DRILLDEF";
/// Command word of the drill execution line
pub const DRILL: &str = "DRILL";
/// Command word of the feed declaration line
pub const VELOCITY: &str = "VEL";
/// Command word of a tool change
pub const FETCH_TOOL: &str = "GETTOOL";
/// Comment marker of the ISEL dialect
pub const COMMENT: &str = ";";

/// How a recognized opcode is rendered
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    /// A single line made of this word and the converted parameters
    Line(&'static str),
    /// Straight move; dropped when none of its targets changed
    Move(&'static str),
    /// `GETTOOL`, preceded by the configured tool-change text
    ToolChange,
    /// One `DRILLDEF` line per parameter
    DrillDefine(DrillCycle),
    /// `DRILL` at the tracked XY position
    DrillExecute,
    /// Rewritten comment text
    Comment(String),
    /// Produces no output at all
    Suppressed,
}

impl Mapping {
    /// Output command word, if the mapping produces a line
    pub fn word(&self) -> Option<&str> {
        match self {
            Mapping::Line(word) | Mapping::Move(word) => Some(*word),
            Mapping::ToolChange => Some(FETCH_TOOL),
            Mapping::DrillDefine(_) => Some(DRILL_DEFINE),
            Mapping::DrillExecute => Some(DRILL),
            Mapping::Comment(text) => Some(text.as_str()),
            Mapping::Suppressed => None,
        }
    }

    /// Fixed literal tokens following the command word
    pub fn modifiers(&self) -> Vec<&'static str> {
        match self {
            Mapping::DrillDefine(cycle) => vec![cycle.literal()],
            _ => Vec::new(),
        }
    }
}

/// Map an opcode to its ISEL form.
pub fn map(opcode: &Opcode, output_comments: bool) -> Mapping {
    let word = match opcode {
        Opcode::Rapid => return Mapping::Move("FASTABS"),
        Opcode::Linear => return Mapping::Move("MOVEABS"),
        Opcode::ArcCw => "CWABS",
        Opcode::ArcCcw => "CCWABS",
        Opcode::PlaneXy => "PLANE XY",
        Opcode::PlaneZx => "PLANE ZX",
        Opcode::PlaneYz => "PLANE YZ",
        Opcode::FeedPerMinute => VELOCITY,
        Opcode::SpindleCw => "SPINDLE CW",
        Opcode::SpindleCcw => "SPINDLE CCW",
        Opcode::SpindleOff => "SPINDLE OFF",
        Opcode::ProgramBegin => "PROGBEGIN",
        Opcode::ProgramEnd => "PROGEND",
        Opcode::CoolantOn => "COOLANT ON",
        Opcode::CoolantOff => "COOLANT OFF",
        Opcode::ClampOn => "WPCLAMP ON",
        Opcode::ClampOff => "WPCLAMP OFF",
        Opcode::PumpOn => "PUMP ON",
        Opcode::PumpOff => "PUMP OFF",
        Opcode::LampOn => "LAMP ON",
        Opcode::LampOff => "LAMP OFF",
        Opcode::Option1On => "POPTION1 ON",
        Opcode::Option1Off => "POPTION1 OFF",
        Opcode::Option2On => "POPTION2 ON",
        Opcode::Option2Off => "POPTION2 OFF",
        Opcode::ToolChange => return Mapping::ToolChange,
        Opcode::DrillDefine(cycle) => return Mapping::DrillDefine(*cycle),
        Opcode::DrillExecute => return Mapping::DrillExecute,
        Opcode::Comment(text) => {
            return if output_comments {
                Mapping::Comment(format!("{COMMENT} {text}"))
            } else {
                Mapping::Suppressed
            };
        }
    };
    Mapping::Line(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_for(raw: &str) -> String {
        let opcode: Opcode = raw.parse().unwrap();
        map(&opcode, true).word().unwrap().to_string()
    }

    #[test]
    fn motion_and_plane_words() {
        assert_eq!(word_for("G0"), "FASTABS");
        assert_eq!(word_for("G1"), "MOVEABS");
        assert_eq!(word_for("G2"), "CWABS");
        assert_eq!(word_for("G3"), "CCWABS");
        assert_eq!(word_for("G18"), "PLANE ZX");
        assert_eq!(word_for("G94"), "VEL");
    }

    #[test]
    fn machine_words() {
        assert_eq!(word_for("M4"), "SPINDLE CCW");
        assert_eq!(word_for("M6"), "GETTOOL");
        assert_eq!(word_for("M30"), "PROGEND");
        assert_eq!(word_for("M8"), "COOLANT ON");
        assert_eq!(word_for("M11"), "WPCLAMP OFF");
        assert_eq!(word_for("lamp on"), "LAMP ON");
    }

    #[test]
    fn drill_define_carries_cycle_literal() {
        let mapping = map(&"G83".parse().unwrap(), true);
        assert_eq!(mapping.word(), Some(DRILL_DEFINE));
        assert_eq!(mapping.modifiers(), ["C2"]);
        assert!(map(&Opcode::Rapid, true).modifiers().is_empty());
    }

    #[test]
    fn comments_follow_the_toggle() {
        let comment = Opcode::Comment("Profile".to_string());
        assert_eq!(map(&comment, true), Mapping::Comment("; Profile".to_string()));
        assert_eq!(map(&comment, false), Mapping::Suppressed);
        assert_eq!(map(&comment, false).word(), None);
    }
}
