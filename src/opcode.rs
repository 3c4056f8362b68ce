//! Recognized input opcodes.

use std::str::FromStr;

use crate::error::CommandError;

/// Drilling cycle selected by a define command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillCycle {
    /// G81, plain drilling
    Simple,
    /// G82, drilling with dwell
    Dwell,
    /// G83, peck drilling
    Peck,
}

impl DrillCycle {
    /// Cycle-type literal of the `DRILLDEF` command
    pub fn literal(self) -> &'static str {
        match self {
            DrillCycle::Simple => "C1",
            DrillCycle::Peck => "C2",
            DrillCycle::Dwell => "C3",
        }
    }
}

/// Every input command the ISEL dialect can express
#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
    PlaneXy,
    PlaneZx,
    PlaneYz,
    DrillDefine(DrillCycle),
    DrillExecute,
    FeedPerMinute,
    SpindleCw,
    SpindleCcw,
    SpindleOff,
    ToolChange,
    ProgramBegin,
    ProgramEnd,
    CoolantOn,
    CoolantOff,
    ClampOn,
    ClampOff,
    PumpOn,
    PumpOff,
    LampOn,
    LampOff,
    Option1On,
    Option1Off,
    Option2On,
    Option2Off,
    /// `(text)` authored in the toolpath
    Comment(String),
}

impl FromStr for Opcode {
    type Err = CommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Some(text) = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Ok(Opcode::Comment(text.to_string()));
        }

        // G/M words match with every space removed, named words keep one
        // space between them
        let compact: String = trimmed
            .split_whitespace()
            .collect::<String>()
            .to_ascii_uppercase();
        let normalized = if is_code_word(&compact) {
            compact
        } else {
            trimmed
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_ascii_uppercase()
        };

        let opcode = match normalized.as_str() {
            "G0" | "G00" => Opcode::Rapid,
            "G1" | "G01" => Opcode::Linear,
            "G2" | "G02" => Opcode::ArcCw,
            "G3" | "G03" => Opcode::ArcCcw,
            "G17" => Opcode::PlaneXy,
            "G18" => Opcode::PlaneZx,
            "G19" => Opcode::PlaneYz,
            "G80" => Opcode::DrillExecute,
            "G81" => Opcode::DrillDefine(DrillCycle::Simple),
            "G82" => Opcode::DrillDefine(DrillCycle::Dwell),
            "G83" => Opcode::DrillDefine(DrillCycle::Peck),
            "G94" => Opcode::FeedPerMinute,
            "M3" | "M03" => Opcode::SpindleCw,
            "M4" | "M04" => Opcode::SpindleCcw,
            "M5" | "M05" => Opcode::SpindleOff,
            "M6" | "M06" => Opcode::ToolChange,
            "PROGBEGIN" => Opcode::ProgramBegin,
            "M2" | "M02" | "M30" => Opcode::ProgramEnd,
            "M7" | "M07" | "M8" | "M08" => Opcode::CoolantOn,
            "M9" | "M09" => Opcode::CoolantOff,
            "M10" => Opcode::ClampOn,
            "M11" => Opcode::ClampOff,
            "PUMP ON" => Opcode::PumpOn,
            "PUMP OFF" => Opcode::PumpOff,
            "LAMP ON" => Opcode::LampOn,
            "LAMP OFF" => Opcode::LampOff,
            "POPTION1 ON" => Opcode::Option1On,
            "POPTION1 OFF" => Opcode::Option1Off,
            "POPTION2 ON" => Opcode::Option2On,
            "POPTION2 OFF" => Opcode::Option2Off,
            _ => {
                return Err(CommandError::UnsupportedOpcode {
                    opcode: trimmed.to_string(),
                })
            }
        };
        Ok(opcode)
    }
}

fn is_code_word(word: &str) -> bool {
    match word.strip_prefix(['G', 'M']) {
        Some(number) => !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
