//! Builtin demo tools.
//!
//! Every tool here converts its own failures into error-flagged
//! [`ToolOutput`] strings; nothing escapes the tool boundary as an
//! exception to the chat loop.

use super::{Tool, ToolOutput, expr, string_arg};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ALLOWED_EXPR_CHARS: &str = "+-*/().";

/// Evaluates a basic arithmetic expression.
pub struct Calculate;

#[async_trait]
impl Tool for Calculate {
    fn name(&self) -> String {
        "calculate".to_string()
    }

    fn description(&self) -> String {
        "Evaluate a mathematical expression".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Mathematical expression to evaluate, e.g. '2 + 2' or '10 * 5'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let expression = match string_arg(&args, "expression") {
            Ok(v) => v,
            Err(out) => return out,
        };

        let sanitized: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        if sanitized
            .chars()
            .any(|c| !c.is_ascii_digit() && !ALLOWED_EXPR_CHARS.contains(c))
        {
            return ToolOutput::error(format!(
                "Error: invalid characters in expression '{expression}'"
            ));
        }

        match expr::evaluate(&sanitized) {
            Ok(result) => ToolOutput::success(format!("Result: {result}")),
            Err(err) => ToolOutput::error(format!(
                "Error: could not calculate '{expression}' - {err}"
            )),
        }
    }
}

static WEATHER_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("london", "15°C, rainy"),
        ("paris", "22°C, sunny"),
        ("tokyo", "18°C, partly cloudy"),
        ("new york", "20°C, clear"),
        ("stockholm", "2°C, snow"),
        ("madrid", "25°C, sunny"),
    ])
});

/// Case-insensitive lookup in a fixed weather table. No network call.
pub struct GetWeather;

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> String {
        "get_weather".to_string()
    }

    fn description(&self) -> String {
        "Get current weather for a location".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name"
                }
            },
            "required": ["location"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let location = match string_arg(&args, "location") {
            Ok(v) => v,
            Err(out) => return out,
        };

        match WEATHER_TABLE.get(location.to_lowercase().trim()) {
            Some(weather) => ToolOutput::success(*weather),
            None => ToolOutput::success(format!("Weather data not available for {location}")),
        }
    }
}

const TIME_SERVICE_BASE: &str = "http://worldtimeapi.org/api/timezone";
const TIME_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Looks up the current time in a timezone via a public time service.
pub struct GetTime {
    client: reqwest::Client,
}

impl GetTime {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn lookup(&self, timezone: &str) -> Result<String, String> {
        let url = format!("{TIME_SERVICE_BASE}/{timezone}");
        let response = self
            .client
            .get(&url)
            .timeout(TIME_LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("time service returned status {}", response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed response body: {e}"))?;

        let datetime = body
            .get("datetime")
            .and_then(Value::as_str)
            .ok_or_else(|| "response had no 'datetime' field".to_string())?;

        // "2024-05-01T14:03:27.123456+02:00" -> "14:03:27"
        let time = datetime
            .split('T')
            .nth(1)
            .and_then(|t| t.split(['.', '+', 'Z']).next())
            .ok_or_else(|| format!("unexpected datetime format: {datetime}"))?;

        Ok(time.to_string())
    }
}

impl Default for GetTime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetTime {
    fn name(&self) -> String {
        "get_time".to_string()
    }

    fn description(&self) -> String {
        "Get current time in a timezone".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": {
                    "type": "string",
                    "description": "Timezone like 'America/New_York' or 'Europe/London'"
                }
            },
            "required": ["timezone"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let timezone = match string_arg(&args, "timezone") {
            Ok(v) => v,
            Err(out) => return out,
        };

        match self.lookup(timezone).await {
            Ok(time) => ToolOutput::success(format!("Current time in {timezone}: {time}")),
            Err(err) => ToolOutput::error(format!("Error getting time for {timezone}: {err}")),
        }
    }
}

/// Reduces a user-supplied filename to its final component, defeating
/// path traversal. Returns `None` for names with no usable component
/// (empty, `..`, a bare directory).
fn sanitize_filename(filename: &str) -> Option<String> {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Creates a file inside a sandbox directory. Safe operation: no
/// approval required.
pub struct CreateFile {
    dir: PathBuf,
}

impl CreateFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for CreateFile {
    fn name(&self) -> String {
        "create_file".to_string()
    }

    fn description(&self) -> String {
        "Create a new file with content".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name of file to create"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write in file"
                }
            },
            "required": ["filename", "content"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let filename = match string_arg(&args, "filename") {
            Ok(v) => v,
            Err(out) => return out,
        };
        let content = match string_arg(&args, "content") {
            Ok(v) => v,
            Err(out) => return out,
        };

        let Some(name) = sanitize_filename(filename) else {
            return ToolOutput::error(format!("Error: invalid filename '{filename}'"));
        };

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            return ToolOutput::error(format!(
                "Error: could not create directory '{}': {e}",
                self.dir.display()
            ));
        }

        let path = self.dir.join(&name);
        if let Err(e) = std::fs::write(&path, content) {
            return match e.kind() {
                std::io::ErrorKind::PermissionDenied => ToolOutput::error(format!(
                    "Access denied: cannot write to '{name}'. File may be locked or insufficient permissions."
                )),
                _ => ToolOutput::error(format!("IO error writing '{name}': {e}")),
            };
        }

        let resolved = std::fs::canonicalize(&path).unwrap_or(path);
        ToolOutput::success(format!(
            "File '{}' created successfully with {} bytes at {}",
            name,
            content.len(),
            resolved.display()
        ))
    }
}

/// Deletes a file from the sandbox directory. Dangerous operation:
/// requires operator approval.
pub struct DeleteFile {
    dir: PathBuf,
}

impl DeleteFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for DeleteFile {
    fn name(&self) -> String {
        "delete_file".to_string()
    }

    fn description(&self) -> String {
        "Delete a file from the demo directory".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Name of file to delete"
                }
            },
            "required": ["filename"]
        })
    }

    fn requires_approval(&self) -> bool {
        true
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let filename = match string_arg(&args, "filename") {
            Ok(v) => v,
            Err(out) => return out,
        };

        let Some(name) = sanitize_filename(filename) else {
            return ToolOutput::error(format!("Error: invalid filename '{filename}'"));
        };

        let path = self.dir.join(&name);
        if !path.exists() {
            // Missing file is a non-fatal result, not an error.
            return ToolOutput::success(format!(
                "File '{name}' not found in the demo directory"
            ));
        }

        match std::fs::remove_file(&path) {
            Ok(()) => ToolOutput::success(format!("File '{name}' deleted successfully")),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ToolOutput::error(format!(
                    "Access denied: cannot delete '{name}'. File may be locked or insufficient permissions."
                ))
            }
            Err(e) => ToolOutput::error(format!("IO error deleting '{name}': {e}")),
        }
    }
}

static DATABASE_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("users", "Found 150 users matching criteria"),
        ("products", "Found 45 products in inventory"),
        ("orders", "Found 230 orders in last 30 days"),
    ])
});

/// Mock database search used by the middleware demo.
pub struct SearchDatabase;

#[async_trait]
impl Tool for SearchDatabase {
    fn name(&self) -> String {
        "search_database".to_string()
    }

    fn description(&self) -> String {
        "Search the demo database for users, products or orders".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> ToolOutput {
        let query = match string_arg(&args, "query") {
            Ok(v) => v,
            Err(out) => return out,
        };

        let lowered = query.to_lowercase();
        for (key, result) in DATABASE_TABLE.iter() {
            if lowered.contains(key) {
                return ToolOutput::success(*result);
            }
        }

        ToolOutput::success(format!("No results found for: {query}"))
    }
}
