//! Export entry points: configuration, optional review and persistence.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::config::Config;
use crate::emitter::translate_program;
use crate::error::ExportError;
use crate::toolpath::Operation;

/// Destination meaning "return the program, do not write it anywhere"
pub const NO_FILE: &str = "-";

/// Interactive review of a generated program before it is persisted
pub trait Review {
    /// Return the program to keep. Returning the input unchanged accepts it.
    fn review(&mut self, program: String) -> String;
}

/// Runs translations with a fixed configuration.
pub struct Exporter {
    config: Config,
    reviewer: Option<Box<dyn Review>>,
    generated_at: Option<NaiveDateTime>,
}

impl Exporter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            reviewer: None,
            generated_at: None,
        }
    }

    /// Reviewer consulted when `show_editor` is set.
    pub fn with_reviewer(mut self, reviewer: impl Review + 'static) -> Self {
        self.reviewer = Some(Box::new(reviewer));
        self
    }

    /// Fix the time reported in the header instead of using the local clock.
    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate and, if enabled, review the program.
    pub fn render(&mut self, operations: &[Operation]) -> String {
        let at = self
            .generated_at
            .unwrap_or_else(|| Local::now().naive_local());
        let program = translate_program(operations, &self.config, at);

        match self.reviewer.as_mut() {
            Some(reviewer) if self.config.show_editor => reviewer.review(program),
            _ => program,
        }
    }

    /// Render and write to `destination` unless it is [`NO_FILE`].
    pub fn export(
        &mut self,
        operations: &[Operation],
        destination: &str,
    ) -> Result<String, ExportError> {
        let program = self.render(operations);
        if destination != NO_FILE {
            persist(Path::new(destination), &program)?;
        }
        Ok(program)
    }
}

/// Write a program, clearing the read-only flag the ISEL tools put on
/// files they have loaded.
pub fn persist(path: &Path, program: &str) -> Result<(), ExportError> {
    match fs::metadata(path) {
        Ok(metadata) => {
            let permissions = metadata.permissions();
            if permissions.readonly() {
                if let Err(e) = fs::set_permissions(path, owner_writable(permissions)) {
                    debug!(path = %path.display(), "cannot clear read-only flag: {e}");
                }
            }
        }
        Err(e) => debug!(path = %path.display(), "no existing file: {e}"),
    }

    fs::write(path, program).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

// read and write for the owner only
#[cfg(unix)]
fn owner_writable(mut permissions: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(0o600);
    permissions
}

#[cfg(not(unix))]
fn owner_writable(mut permissions: fs::Permissions) -> fs::Permissions {
    permissions.set_readonly(false);
    permissions
}

/// Translate `operations` with options given as a single string and write
/// the result to `destination`.
pub fn export(
    operations: &[Operation],
    destination: &str,
    args: &str,
) -> Result<String, ExportError> {
    let config = Config::from_args(args)?;
    Exporter::new(config).export(operations, destination)
}
