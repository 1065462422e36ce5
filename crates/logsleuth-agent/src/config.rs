//! Environment-driven configuration, validated at startup. A missing
//! credential or system prompt source is fatal here and nowhere else.

use std::env;
use std::fs;
use std::path::PathBuf;

use logsleuth_core::{AgentError, Result};

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a DevOps expert analyzing application logs for operators. \
Use the available tools to read, list and search log files, and answer \
questions about errors and patterns you find in them. \
Classify issues by severity: P1 (OutOfMemoryError, pod crashes), \
P2 (errors, degradation), P3 (warnings). \
If a Kubernetes restart tool is available, recommend a restart for P1 issues \
but always ask the operator for confirmation before performing one. \
If you cannot answer from the logs, say so plainly.";

#[derive(Debug, Clone)]
pub enum SystemPromptSource {
    Inline(String),
    File(PathBuf),
}

impl SystemPromptSource {
    pub fn resolve(&self) -> Result<String> {
        match self {
            SystemPromptSource::Inline(prompt) => Ok(prompt.clone()),
            SystemPromptSource::File(path) => fs::read_to_string(path).map_err(|e| {
                AgentError::Config(format!(
                    "System prompt file not found: {}: {}",
                    path.display(),
                    e
                ))
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub log_dir: PathBuf,
    pub namespace: String,
    pub max_iterations: u32,
    pub system_prompt: SystemPromptSource,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` goes through here so
    /// the parsing is testable without touching process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("GEMINI_API_KEY").filter(|k| !k.is_empty()).ok_or_else(|| {
            AgentError::Config(
                "GEMINI_API_KEY not found. Please set it in .env or the environment.".to_string(),
            )
        })?;

        let temperature = match get("TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|_| AgentError::Config(format!("Invalid TEMPERATURE: {}", raw)))?,
            None => 0.1,
        };

        let max_iterations = match get("MAX_ITERATIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| AgentError::Config(format!("Invalid MAX_ITERATIONS: {}", raw)))?,
            None => 5,
        };

        let system_prompt = match get("SYSTEM_PROMPT_FILE") {
            Some(path) => SystemPromptSource::File(PathBuf::from(path)),
            None => SystemPromptSource::Inline(DEFAULT_SYSTEM_PROMPT.to_string()),
        };

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            temperature,
            log_dir: PathBuf::from(get("LOG_DIRECTORY").unwrap_or_else(|| "logs".to_string())),
            namespace: get("K8S_DEFAULT_NAMESPACE").unwrap_or_else(|| "production".to_string()),
            max_iterations,
            system_prompt,
        })
    }

    /// Ensure the log directory exists and the prompt source is readable.
    pub fn validate(&self) -> Result<()> {
        if !self.log_dir.exists() {
            fs::create_dir_all(&self.log_dir).map_err(|e| {
                AgentError::Config(format!(
                    "Could not create log directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }
        self.system_prompt.resolve().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "test-key")])).unwrap();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.namespace, "production");
        assert_eq!(config.max_iterations, 5);
        assert!(matches!(config.system_prompt, SystemPromptSource::Inline(_)));
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = AgentConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, AgentError::Config(msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_overrides() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-pro"),
            ("TEMPERATURE", "0.7"),
            ("LOG_DIRECTORY", "/var/log/app"),
            ("K8S_DEFAULT_NAMESPACE", "staging"),
            ("MAX_ITERATIONS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/app"));
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.max_iterations, 3);
    }

    #[test]
    fn test_bad_temperature_is_config_error() {
        let err = AgentConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("TEMPERATURE", "warm"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AgentError::Config(msg) if msg.contains("TEMPERATURE")));
    }

    #[test]
    fn test_prompt_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_prompt.txt");
        std::fs::write(&path, "custom prompt").unwrap();

        let source = SystemPromptSource::File(path);
        assert_eq!(source.resolve().unwrap(), "custom prompt");

        let missing = SystemPromptSource::File(dir.path().join("nope.txt"));
        assert!(matches!(missing.resolve(), Err(AgentError::Config(_))));
    }

    #[test]
    fn test_validate_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let config = AgentConfig {
            api_key: "k".into(),
            model: "m".into(),
            temperature: 0.1,
            log_dir: log_dir.clone(),
            namespace: "production".into(),
            max_iterations: 5,
            system_prompt: SystemPromptSource::Inline("p".into()),
        };

        config.validate().unwrap();
        assert!(log_dir.is_dir());
    }
}
