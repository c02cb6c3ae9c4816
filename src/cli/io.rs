//! JSON-lines I/O for the CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line, flushed after each
//! - UTF-8 only

use std::io::Write;

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response
pub fn write_response<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    write_line(
        writer,
        &json!({
            "status": "ok",
            "data": data
        }),
    )
}

/// Write an error response
pub fn write_error<W: Write>(
    writer: &mut W,
    code: &str,
    status_code: u16,
    message: &str,
) -> CliResult<()> {
    write_line(
        writer,
        &json!({
            "status": "error",
            "code": code,
            "status_code": status_code,
            "message": message
        }),
    )
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
