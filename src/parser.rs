//! Reads G-code text into toolpath commands.
//!
//! One command per line. Supported forms:
//!
//! ```text
//! N10 G1 X6.921 Y2.112 F600   ; trailing comment
//! (Pocket001)
//! PUMP ON
//! ```
//!
//! A whole-line `(...)` becomes a comment command, inline `(...)` and `;`
//! comments are dropped. Opcodes are either a single G/M word or every word
//! up to the first parameter (`PUMP ON`, `POPTION1 OFF`).

use std::path::Path;
use std::sync::LazyLock;

use fancy_regex::Regex;
use miette::{NamedSource, SourceSpan};

use crate::error::{ExportError, ParseError};
use crate::toolpath::{Command, Operation, ToolpathNode};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("word pattern is valid"));

static INLINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("comment pattern is valid"));

static CODE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[GMgm]\d+(?:\.\d+)?$").expect("code pattern is valid"));

static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[Nn]\d+$").expect("line number pattern is valid"));

// a letter directly followed by something numeric, e.g. X-1.5 or F.5
static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<code>[A-Za-z])(?<value>(?=[-+.\d]).*)$").expect("parameter pattern is valid")
});

struct Word<'s> {
    text: &'s str,
    offset: usize,
}

struct Source<'s> {
    name: &'s str,
    text: &'s str,
}

impl Source<'_> {
    fn named(&self) -> NamedSource<String> {
        NamedSource::new(self.name, self.text.to_string())
    }

    fn span(&self, offset: usize, len: usize) -> SourceSpan {
        (offset, len).into()
    }
}

/// Parse G-code text. `name` is only used in diagnostics.
pub fn parse_program(name: &str, text: &str) -> Result<Vec<Command>, ParseError> {
    let source = Source { name, text };
    let mut commands = Vec::new();
    let mut line_start = 0;

    for raw in text.split_inclusive('\n') {
        let offset = line_start;
        line_start += raw.len();
        let line = raw.trim_end_matches(['\r', '\n']);

        if let Some(command) = parse_line(&source, line, offset)? {
            commands.push(command);
        }
    }

    Ok(commands)
}

fn parse_line(source: &Source, line: &str, offset: usize) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('(') {
        let comment = trimmed.trim_end();
        if !comment.ends_with(')') {
            let start = offset + (line.len() - trimmed.len());
            return Err(ParseError::UnterminatedComment {
                src: source.named(),
                span: source.span(start, comment.len()),
            });
        }
        return Ok(Some(Command::new(comment)));
    }

    let code = match line.find(';') {
        Some(at) => &line[..at],
        None => line,
    };
    // keep byte offsets stable by blanking inline comments
    let code = INLINE_COMMENT
        .replace_all(code, |caps: &fancy_regex::Captures| " ".repeat(caps[0].len()))
        .into_owned();

    let mut words = Vec::new();
    for found in WORD.find_iter(&code) {
        let found = found.map_err(|e| regex_error(source, offset, line, e))?;
        words.push(Word {
            text: &code[found.start()..found.end()],
            offset: offset + found.start(),
        });
    }

    let mut rest = words.as_slice();
    if let [first, tail @ ..] = rest {
        if is_match(&LINE_NUMBER, first.text) {
            rest = tail;
        }
    }
    let Some(first) = rest.first() else {
        return Ok(None);
    };

    let opcode_len = if is_match(&CODE_WORD, first.text) {
        1
    } else {
        rest.iter()
            .position(|word| is_match(&PARAMETER, word.text))
            .unwrap_or(rest.len())
            .max(1)
    };
    let opcode = rest[..opcode_len]
        .iter()
        .map(|word| word.text)
        .collect::<Vec<_>>()
        .join(" ");

    let mut command = Command::new(opcode);
    for word in &rest[opcode_len..] {
        let (code, value) = parse_parameter(source, word)?;
        command = command.param(code, value);
    }

    Ok(Some(command))
}

fn parse_parameter(source: &Source, word: &Word) -> Result<(char, f64), ParseError> {
    let span = source.span(word.offset, word.text.len());
    let caps = PARAMETER
        .captures(word.text)
        .ok()
        .flatten()
        .ok_or_else(|| ParseError::UnexpectedWord {
            src: source.named(),
            span,
        })?;

    let code = caps["code"].chars().next().unwrap_or_default();
    let value = caps["value"]
        .parse::<f64>()
        .map_err(|e| ParseError::InvalidNumber {
            message: e.to_string(),
            src: source.named(),
            span,
        })?;
    Ok((code, value))
}

fn is_match(pattern: &Regex, text: &str) -> bool {
    pattern.is_match(text).unwrap_or(false)
}

fn regex_error(source: &Source, offset: usize, line: &str, e: fancy_regex::Error) -> ParseError {
    ParseError::InvalidNumber {
        message: e.to_string(),
        src: source.named(),
        span: source.span(offset, line.len()),
    }
}

/// Read a G-code file as one operation labelled with the file stem.
pub fn read_operation(path: &Path) -> Result<Operation, ExportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let label = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let commands = parse_program(&path.display().to_string(), &text)?;
    Ok(Operation::new(label.clone(), ToolpathNode::path(label, commands)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Command> {
        parse_program("<test>", text).unwrap()
    }

    #[test]
    fn motion_line() {
        let commands = parse("G1 X6.921 Y-2.5 F600\n");
        assert_eq!(
            commands,
            [Command::new("G1").param('X', 6.921).param('Y', -2.5).param('F', 600.0)]
        );
    }

    #[test]
    fn comments_and_line_numbers() {
        let commands = parse("(Pocket001)\r\nN20 G0 Z5 (retract) ; safe height\n\n; only a comment\n");
        assert_eq!(
            commands,
            [Command::new("(Pocket001)"), Command::new("G0").param('Z', 5.0)]
        );
    }

    #[test]
    fn multi_word_opcodes() {
        let commands = parse("PUMP ON\nPOPTION1 OFF\nprogbegin\n");
        let opcodes: Vec<&str> = commands.iter().map(|c| c.opcode.as_str()).collect();
        assert_eq!(opcodes, ["PUMP ON", "POPTION1 OFF", "progbegin"]);
    }

    #[test]
    fn lowercase_codes_are_normalized() {
        let commands = parse("g2 x1 y1 i.5 j0\n");
        assert_eq!(commands[0].opcode, "g2");
        assert_eq!(commands[0].get('I'), Some(0.5));
        assert_eq!(commands[0].get('X'), Some(1.0));
    }

    #[test]
    fn parameter_order_is_kept() {
        let commands = parse("G83 R2 Z-5 Q1\n");
        let codes: Vec<char> = commands[0].parameters.keys().copied().collect();
        assert_eq!(codes, ['R', 'Z', 'Q']);
    }

    #[test]
    fn bad_number_points_at_the_word() {
        let err = parse_program("<test>", "G0 Z5\nG1 X1..2\n").unwrap_err();
        match err {
            ParseError::InvalidNumber { span, .. } => {
                assert_eq!(span.offset(), 9);
                assert_eq!(span.len(), 5);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn stray_word_is_rejected() {
        let err = parse_program("<test>", "G1 X1 fast\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedWord { .. }));
    }

    #[test]
    fn unterminated_comment_is_rejected() {
        let err = parse_program("<test>", "  (no end\n").unwrap_err();
        match err {
            ParseError::UnterminatedComment { span, .. } => assert_eq!(span.offset(), 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
