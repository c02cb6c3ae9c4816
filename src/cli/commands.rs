//! CLI command implementations
//!
//! Every command loads the config first, applies its log level, then opens
//! the store under `data_dir`. Responses go to the given writer (stdout in
//! production), logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::json;

use crate::config::Config;
use crate::content::ContentService;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::storage;
use crate::store::RecordStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};
use super::request::{Request, BAD_REQUEST_CODE};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let mut stdout = io::stdout();
    match cmd {
        Command::Init { config } => init(&config, &mut stdout),
        Command::Seed { config } => seed(&config, &mut stdout),
        Command::Exec { config } => {
            let stdin = io::stdin();
            exec(&config, stdin.lock(), &mut stdout)
        }
    }
}

/// Create the data directory and an empty record file
pub fn init<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    RecordStore::open(data_dir)?;

    let records = storage::records_path(data_dir);
    write_response(
        out,
        json!({"initialized": true, "records": records.to_string_lossy()}),
    )
}

/// Seed an initialized, empty store with sample content
pub fn seed<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let service = open_service(config_path)?;
    let seeded = service.seed_sample_content()?;
    let stats = service.stats()?;

    write_response(
        out,
        json!({
            "seeded": seeded,
            "total_posts": stats.total_posts,
            "total_categories": stats.total_categories,
        }),
    )
}

/// Answer JSON requests from `input`, one per line, until end of input
pub fn exec<R: BufRead, W: Write>(config_path: &Path, input: R, out: &mut W) -> CliResult<()> {
    let service = open_service(config_path)?;
    serve_lines(&service, input, out)
}

/// Request loop shared by `exec` and tests.
///
/// A malformed line (bad JSON or bad UTF-8) or a failed operation is answered
/// with an error line and the loop continues; only I/O failures end it.
pub fn serve_lines<R: BufRead, W: Write>(
    service: &ContentService,
    mut input: R,
    out: &mut W,
) -> CliResult<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                let message = format!("request is not valid UTF-8: {}", e);
                write_error(out, BAD_REQUEST_CODE, 400, &message)?;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                write_error(out, BAD_REQUEST_CODE, 400, &e.to_string())?;
                continue;
            }
        };

        match request.dispatch(service) {
            Ok(response) => write_response(out, serde_json::to_value(&response)?)?,
            Err(e) => write_error(out, e.code(), e.status_code(), &e.to_string())?,
        }
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity());

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", config.data_dir.as_str()),
            ("delete_policy", config.delete_policy.as_str()),
        ],
    );
    Ok(config)
}

fn open_service(config_path: &Path) -> CliResult<ContentService> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let store = RecordStore::open(data_dir)?;
    Ok(ContentService::new(store, config.service_options()))
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    storage::records_path(data_dir).exists()
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir, extra: Value) -> std::path::PathBuf {
        let config_path = temp_dir.path().join("quilldb.json");
        let data_dir = temp_dir.path().join("data");

        let mut config = json!({
            "data_dir": data_dir.to_string_lossy()
        });
        if let (Some(map), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            map.extend(extra.clone());
        }

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn output_lines(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_init_creates_record_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));
        let mut out = Vec::new();

        init(&config_path, &mut out).unwrap();

        assert!(storage::records_path(&temp_dir.path().join("data")).exists());
        assert_eq!(output_lines(out)[0]["data"]["initialized"], true);
    }

    #[test]
    fn test_init_refuses_reinit() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));

        init(&config_path, &mut Vec::new()).unwrap();

        let result = init(&config_path, &mut Vec::new());
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );
    }

    #[test]
    fn test_exec_requires_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));

        let result = exec(&config_path, io::empty(), &mut Vec::new());
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({"page_size": 0}));

        let result = init(&config_path, &mut Vec::new());
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_seed_then_exec_persists_across_commands() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));
        init(&config_path, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        seed(&config_path, &mut out).unwrap();
        let lines = output_lines(out);
        assert_eq!(lines[0]["data"]["seeded"], true);
        assert_eq!(lines[0]["data"]["total_posts"], 12);

        let mut out = Vec::new();
        seed(&config_path, &mut out).unwrap();
        assert_eq!(output_lines(out)[0]["data"]["seeded"], false);

        let input = "{\"op\": \"stats\"}\n";
        let mut out = Vec::new();
        exec(&config_path, input.as_bytes(), &mut out).unwrap();
        assert_eq!(output_lines(out)[0]["data"]["total_categories"], 5);
    }

    #[test]
    fn test_exec_answers_every_line() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));
        init(&config_path, &mut Vec::new()).unwrap();

        let input = concat!(
            "{\"op\": \"create_category\", \"name\": \"Tech\"}\n",
            "{\"op\": \"create_post\", \"title\": \"Intro\", \"body\": \"Databases are like spreadsheets\", \"category_id\": 1}\n",
            "\n",
            "not json\n",
            "{\"op\": \"search_posts\", \"term\": \"spreadsheet\"}\n",
            "{\"op\": \"delete_category\", \"id\": 1}\n",
        );
        let mut out = Vec::new();
        exec(&config_path, input.as_bytes(), &mut out).unwrap();

        let lines = output_lines(out);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["data"]["name"], "Tech");
        assert_eq!(lines[1]["data"]["id"], 1);
        assert_eq!(lines[2]["code"], BAD_REQUEST_CODE);
        assert_eq!(lines[3]["data"]["total_items"], 1);
        assert_eq!(lines[3]["data"]["items"][0]["title"], "Intro");
        assert_eq!(lines[4]["status"], "error");
        assert_eq!(lines[4]["code"], "QUILL_CATEGORY_IN_USE");
        assert_eq!(lines[4]["status_code"], 409);
    }

    #[test]
    fn test_exec_survives_invalid_utf8_line() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));
        init(&config_path, &mut Vec::new()).unwrap();

        let input: &[u8] = b"{\"op\": \"stats\"}\n\xff\xfe\n{\"op\": \"stats\"}\r\n";
        let mut out = Vec::new();
        exec(&config_path, input, &mut out).unwrap();

        let lines = output_lines(out);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[1]["code"], BAD_REQUEST_CODE);
        assert_eq!(lines[1]["status_code"], 400);
        assert!(lines[1]["message"].as_str().unwrap().contains("UTF-8"));
        assert_eq!(lines[2]["status"], "ok");
    }
}
