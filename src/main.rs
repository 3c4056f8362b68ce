use std::path::PathBuf;
use std::{env, fs, process};

use clap::Parser;
use isel_post::{read_operation, Config, Exporter, Job, PostArgs, Review, NO_FILE};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Translate G-code files into an ISEL IMF_PBL program
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// G-code files, each one becomes an operation
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file, `-` prints the program instead
    #[arg(short, long, default_value = NO_FILE)]
    output: String,

    /// Machine name reported in the operation headers
    #[arg(long)]
    machine: Option<String>,

    /// Unit system declared by the machine (reported only)
    #[arg(long)]
    machine_units: Option<String>,

    #[command(flatten)]
    post: PostArgs,
}

/// Opens the program in `$EDITOR` and keeps whatever is saved.
struct EditorReview {
    editor: String,
}

impl EditorReview {
    fn edit(&self, program: &str) -> std::io::Result<String> {
        let path = env::temp_dir().join(format!("isel-post-review-{}.ncp", process::id()));
        fs::write(&path, program)?;

        let mut words = self.editor.split_whitespace();
        let status = process::Command::new(words.next().unwrap_or("vi"))
            .args(words)
            .arg(&path)
            .status();
        let edited = match status {
            Ok(status) if status.success() => fs::read_to_string(&path),
            Ok(status) => Err(std::io::Error::other(format!("editor exited with {status}"))),
            Err(e) => Err(e),
        };
        let _ = fs::remove_file(&path);
        edited
    }
}

impl Review for EditorReview {
    fn review(&mut self, program: String) -> String {
        match self.edit(&program) {
            Ok(edited) => edited,
            Err(e) => {
                warn!("review with {} failed, keeping generated program: {e}", self.editor);
                program
            }
        }
    }
}

fn main() -> miette::Result<()> {
    // stdout may carry the program
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let job = (cli.machine.is_some() || cli.machine_units.is_some()).then(|| Job {
        machine: cli.machine.clone(),
        machine_units: cli.machine_units.clone(),
    });

    let mut operations = Vec::with_capacity(cli.inputs.len());
    for input in &cli.inputs {
        let mut operation = read_operation(input)?;
        operation.job = job.clone();
        operations.push(operation);
    }

    let mut exporter = Exporter::new(Config::from(cli.post));
    if exporter.config().show_editor {
        let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        exporter = exporter.with_reviewer(EditorReview { editor });
    }

    let program = exporter.export(&operations, &cli.output)?;
    if cli.output == NO_FILE {
        print!("{program}");
    }

    Ok(())
}
