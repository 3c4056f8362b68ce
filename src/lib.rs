//! Post-processor for ISEL ICP-4030 controllers.
//!
//! Translates generic G-code toolpaths into the ISEL `IMF_PBL_V1.0` dialect
//! described in the `operating_instruction_remote` manual: positions in µm,
//! velocities in µm/s, every line carrying an `N` sequence number.
//!
//! ```no_run
//! use isel_post::{export, Command, Operation, ToolpathNode};
//!
//! let path = ToolpathNode::path(
//!     "Profile",
//!     vec![
//!         Command::new("G0").param('X', 0.0).param('Y', 0.0).param('Z', 5.0),
//!         Command::new("G1").param('Z', -1.0).param('F', 300.0),
//!     ],
//! );
//! let program = export(&[Operation::new("Profile", path)], "out.ncp", "--no-comments")?;
//! print!("{program}");
//! # Ok::<(), isel_post::ExportError>(())
//! ```

pub mod config;
pub mod drill;
pub mod emitter;
pub mod error;
pub mod export;
pub mod lineno;
pub mod mapper;
pub mod modal;
pub mod opcode;
pub mod params;
pub mod parser;
pub mod toolpath;
pub mod translate;
pub mod units;

pub use config::{Config, PostArgs};
pub use emitter::{translate_program, Emitter};
pub use error::{CommandError, ConfigError, ExportError, ParseError};
pub use export::{export, persist, Exporter, Review, NO_FILE};
pub use modal::ModalState;
pub use opcode::Opcode;
pub use parser::{parse_program, read_operation};
pub use toolpath::{Command, Job, Operation, Parameters, ToolpathNode};
pub use translate::translate_command;
