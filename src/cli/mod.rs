//! CLI module for quilldb
//!
//! Provides command-line interface for:
//! - init: Create the data directory and record file
//! - seed: Load sample content into an empty store
//! - exec: JSON-lines request loop over stdin/stdout

mod args;
mod commands;
mod errors;
mod io;
mod request;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, seed, serve_lines};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
pub use request::{Request, Response, BAD_REQUEST_CODE};
