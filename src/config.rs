//! Post-processor options.
//!
//! The same options are accepted on the command line and as a single
//! shell-like argument string handed over by a host application, e.g.
//! `--no-comments --preamble "FASTVEL 30000"`.

use std::str::FromStr;
use std::sync::LazyLock;

use clap::{Args, Parser};
use fancy_regex::Regex;

use crate::error::ConfigError;

/// Default text emitted before the first operation
pub const PREAMBLE: &str = "; NEXT LINE IS THE MACHINE RAPID SPEED
FASTVEL 50000
PLANE XY";

/// Default text emitted after the last operation
pub const POSTAMBLE: &str = "SPINDLE OFF
PROGEND";

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PostArgs {
    /// Suppress comment output
    #[arg(long)]
    pub no_comments: bool,

    /// Review the program in an editor before writing it
    #[arg(long)]
    pub show_editor: bool,

    /// Commands issued before the first operation
    #[arg(long, allow_hyphen_values = true)]
    pub preamble: Option<String>,

    /// Commands issued after the last operation
    #[arg(long, allow_hyphen_values = true)]
    pub postamble: Option<String>,

    /// Commands issued before each operation
    #[arg(long, allow_hyphen_values = true)]
    pub preoperation: Option<String>,

    /// Commands issued after each operation
    #[arg(long, allow_hyphen_values = true)]
    pub postoperation: Option<String>,

    /// Commands issued before each tool change
    #[arg(long, allow_hyphen_values = true)]
    pub toolchange: Option<String>,
}

/// Option string as handed over by a host: no program name, no help flag.
#[derive(Parser, Debug)]
#[command(
    name = "isel",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct OptionString {
    #[command(flatten)]
    args: PostArgs,
}

/// Settings for one translation run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_comments: bool,
    pub show_editor: bool,
    pub preamble: String,
    pub postamble: String,
    pub pre_operation: String,
    pub post_operation: String,
    pub tool_change: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_comments: true,
            show_editor: false,
            preamble: PREAMBLE.to_string(),
            postamble: POSTAMBLE.to_string(),
            pre_operation: String::new(),
            post_operation: String::new(),
            tool_change: String::new(),
        }
    }
}

impl From<PostArgs> for Config {
    fn from(args: PostArgs) -> Self {
        let defaults = Config::default();
        Self {
            output_comments: !args.no_comments,
            show_editor: args.show_editor,
            preamble: args.preamble.unwrap_or(defaults.preamble),
            postamble: args.postamble.unwrap_or(defaults.postamble),
            pre_operation: args.preoperation.unwrap_or(defaults.pre_operation),
            post_operation: args.postoperation.unwrap_or(defaults.post_operation),
            tool_change: args.toolchange.unwrap_or(defaults.tool_change),
        }
    }
}

impl Config {
    /// Parse a shell-like option string.
    pub fn from_args(args: &str) -> Result<Self, ConfigError> {
        let words = split_args(args)?;
        let parsed = OptionString::try_parse_from(words).map_err(|e| ConfigError::Invalid {
            message: e.to_string().lines().next().unwrap_or_default().to_string(),
        })?;
        Ok(parsed.args.into())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(args: &str) -> Result<Self, Self::Err> {
        Config::from_args(args)
    }
}

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[^\s"']+|"[^"]*"|'[^']*')+"#).expect("word pattern is valid")
});

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?<double>[^"]*)"|'(?<single>[^']*)'|(?<bare>[^"']+)"#)
        .expect("segment pattern is valid")
});

fn regex_failure(e: fancy_regex::Error) -> ConfigError {
    ConfigError::Invalid {
        message: e.to_string(),
    }
}

/// Split an option string into words, honoring single and double quotes.
pub fn split_args(args: &str) -> Result<Vec<String>, ConfigError> {
    let mut words = Vec::new();
    let mut end = 0;

    for found in WORD.find_iter(args) {
        let found = found.map_err(regex_failure)?;
        check_gap(args, end, found.start())?;
        end = found.end();

        let mut word = String::new();
        for segment in SEGMENT.captures_iter(found.as_str()) {
            let segment = segment.map_err(regex_failure)?;
            if let Some(part) = segment
                .name("double")
                .or_else(|| segment.name("single"))
                .or_else(|| segment.name("bare"))
            {
                word.push_str(part.as_str());
            }
        }
        words.push(word);
    }
    check_gap(args, end, args.len())?;

    Ok(words)
}

/// Anything between two words must be whitespace; a quote there was never closed.
fn check_gap(args: &str, start: usize, end: usize) -> Result<(), ConfigError> {
    match args[start..end].find(['"', '\'']) {
        Some(at) => Err(ConfigError::UnterminatedQuote { offset: start + at }),
        None => Ok(()),
    }
}
