//! Log file tools: read, list, and search application logs under a
//! configured directory.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ToolError, generate_schema};
use logsleuth_core::{Tool, ToolResult};

/// Filenames are plain names inside the log directory; anything that could
/// escape it is rejected as invalid arguments.
fn validate_filename(filename: &str) -> Result<(), ToolError> {
    if filename.is_empty() {
        return Err(ToolError::InvalidArguments(
            "filename must not be empty".to_string(),
        ));
    }
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ToolError::InvalidArguments(format!(
            "invalid filename: {}",
            filename
        )));
    }
    Ok(())
}

pub struct ReadLogFileTool {
    log_dir: PathBuf,
}

impl ReadLogFileTool {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ReadLogInput {
    /// Name of the log file to read, e.g. 'app.log'
    filename: String,
}

#[async_trait]
impl Tool for ReadLogFileTool {
    fn id(&self) -> &str {
        "read_log_file"
    }

    fn name(&self) -> &str {
        "Read Log File"
    }

    fn description(&self) -> &str {
        "Read the full contents of a log file. Input should be the filename, e.g. 'app.log'."
    }

    fn input_schema(&self) -> Value {
        generate_schema::<ReadLogInput>()
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let input: ReadLogInput = match serde_json::from_value(args) {
            Ok(input) => input,
            Err(e) => return ToolError::InvalidArguments(e.to_string()).into(),
        };

        if let Err(e) = validate_filename(&input.filename) {
            return e.into();
        }

        let path = self.log_dir.join(&input.filename);
        match fs::read_to_string(&path) {
            Ok(content) => ToolResult::ok(content),
            Err(_) => ToolResult::ok(format!("Log file {} not found", input.filename)),
        }
    }
}

pub struct ListLogFilesTool {
    log_dir: PathBuf,
}

impl ListLogFilesTool {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListLogsInput {}

fn log_file_names(log_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".log"))
        .collect();
    names.sort();
    Ok(names)
}

#[async_trait]
impl Tool for ListLogFilesTool {
    fn id(&self) -> &str {
        "list_log_files"
    }

    fn name(&self) -> &str {
        "List Log Files"
    }

    fn description(&self) -> &str {
        "List all .log files available in the log directory. Takes no arguments."
    }

    fn input_schema(&self) -> Value {
        generate_schema::<ListLogsInput>()
    }

    async fn execute(&self, _args: Value) -> ToolResult {
        match log_file_names(&self.log_dir) {
            Ok(names) if names.is_empty() => ToolResult::ok(format!(
                "No .log files found in {}",
                self.log_dir.display()
            )),
            Ok(names) => ToolResult::ok(format!("Available log files:\n{}", names.join("\n"))),
            Err(e) => ToolError::ExecutionFailed(format!(
                "could not read log directory {}: {}",
                self.log_dir.display(),
                e
            ))
            .into(),
        }
    }
}

pub struct SearchLogsTool {
    log_dir: PathBuf,
}

impl SearchLogsTool {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchLogsInput {
    /// Name of the log file to search, e.g. 'app.log'
    filename: String,
    /// Term to search for (case-insensitive)
    search_term: String,
}

#[async_trait]
impl Tool for SearchLogsTool {
    fn id(&self) -> &str {
        "search_logs"
    }

    fn name(&self) -> &str {
        "Search Logs"
    }

    fn description(&self) -> &str {
        "Search a log file for lines containing a term (case-insensitive). \
         Inputs: filename and search_term."
    }

    fn input_schema(&self) -> Value {
        generate_schema::<SearchLogsInput>()
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let input: SearchLogsInput = match serde_json::from_value(args) {
            Ok(input) => input,
            Err(e) => return ToolError::InvalidArguments(e.to_string()).into(),
        };

        if let Err(e) = validate_filename(&input.filename) {
            return e.into();
        }

        let path = self.log_dir.join(&input.filename);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return ToolResult::ok(format!("Log file {} not found", input.filename)),
        };

        let term = input.search_term.to_lowercase();
        let matches: Vec<&str> = content
            .lines()
            .filter(|line| line.to_lowercase().contains(&term))
            .collect();

        if matches.is_empty() {
            ToolResult::ok(format!(
                "No matches for '{}' in {}",
                input.search_term, input.filename
            ))
        } else {
            ToolResult::ok(format!(
                "Found {} matching lines in {}:\n{}",
                matches.len(),
                input.filename,
                matches.join("\n")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn setup_logs() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut app = fs::File::create(dir.path().join("app.log")).unwrap();
        writeln!(app, "2024-01-01 10:00:00 INFO Application started").unwrap();
        writeln!(app, "2024-01-01 10:05:12 ERROR Database connection failed").unwrap();
        writeln!(app, "2024-01-01 10:05:13 error retrying connection").unwrap();
        fs::File::create(dir.path().join("error.log")).unwrap();
        fs::File::create(dir.path().join("notes.txt")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_read_log_file() {
        let dir = setup_logs();
        let tool = ReadLogFileTool::new(dir.path());

        let result = tool.execute(json!({"filename": "app.log"})).await;
        assert!(result.success);
        assert!(result.output.contains("Application started"));
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found_text() {
        let dir = setup_logs();
        let tool = ReadLogFileTool::new(dir.path());

        let result = tool.execute(json!({"filename": "missing.log"})).await;
        assert!(result.success);
        assert_eq!(result.output, "Log file missing.log not found");
    }

    #[tokio::test]
    async fn test_read_rejects_traversal() {
        let dir = setup_logs();
        let tool = ReadLogFileTool::new(dir.path());

        let result = tool.execute(json!({"filename": "../etc/passwd"})).await;
        assert!(!result.success);
        assert!(result.output.contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_read_invalid_arguments() {
        let dir = setup_logs();
        let tool = ReadLogFileTool::new(dir.path());

        let result = tool.execute(json!({"file": "app.log"})).await;
        assert!(!result.success);
        assert!(result.output.contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_list_log_files() {
        let dir = setup_logs();
        let tool = ListLogFilesTool::new(dir.path());

        let result = tool.execute(json!({})).await;
        assert!(result.success);
        assert!(result.output.contains("app.log"));
        assert!(result.output.contains("error.log"));
        assert!(!result.output.contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_execution_failure() {
        let tool = ListLogFilesTool::new("/nonexistent/logsleuth-test-logs");

        let result = tool.execute(json!({})).await;
        assert!(!result.success);
        assert!(result.output.starts_with("Tool execution failed:"));
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ListLogFilesTool::new(dir.path());

        let result = tool.execute(json!({})).await;
        assert!(result.success);
        assert!(result.output.contains("No .log files found"));
    }

    #[tokio::test]
    async fn test_search_logs_case_insensitive() {
        let dir = setup_logs();
        let tool = SearchLogsTool::new(dir.path());

        let result = tool
            .execute(json!({"filename": "app.log", "search_term": "ERROR"}))
            .await;
        assert!(result.success);
        assert!(result.output.contains("Found 2 matching lines"));
        assert!(result.output.contains("Database connection failed"));
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let dir = setup_logs();
        let tool = SearchLogsTool::new(dir.path());

        let result = tool
            .execute(json!({"filename": "app.log", "search_term": "OutOfMemory"}))
            .await;
        assert!(result.success);
        assert_eq!(result.output, "No matches for 'OutOfMemory' in app.log");
    }
}
