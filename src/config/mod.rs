use dashmap::DashMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment keys read by [`ErrorResponderConfig::from_config_service`]
pub const SHOW_STACK_KEY: &str = "ERROR_SHOW_STACK";
pub const SHOW_MESSAGE_KEY: &str = "ERROR_SHOW_MESSAGE";
pub const DUMP_EXCEPTIONS_KEY: &str = "ERROR_DUMP_EXCEPTIONS";
pub const LOG_FILE_KEY: &str = "ERROR_LOG_FILE";
pub const TEMPLATE_KEY: &str = "ERROR_TEMPLATE";

pub const DEFAULT_TEMPLATE: &str = "error.html";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a service preloaded with the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Read a boolean flag. `1`, `true`, `yes` and `on` are true; anything else is false.
    pub fn get_flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false)
    }
}

/// Options captured by an [`ErrorResponder`](crate::exception::ErrorResponder)
///
/// Every field is optional and defaults to disabled. Nothing is validated.
///
/// Deserialization also accepts the camelCase option names (`showStack`,
/// `showMessage`, `dumpExceptions`, `logErrors`), with `logErrors: false`
/// meaning "no log file".
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErrorResponderConfig {
    /// Expose the error message and stack trace to the client
    #[serde(alias = "showStack")]
    pub show_stack: bool,

    /// Expose the error message to the client
    #[serde(alias = "showMessage")]
    pub show_message: bool,

    /// Write stack traces to the diagnostic stream
    #[serde(alias = "dumpExceptions")]
    pub dump_exceptions: bool,

    /// Append a log entry for every error to this file
    #[serde(alias = "logErrors", deserialize_with = "deserialize_log_target")]
    pub log_errors: Option<PathBuf>,

    /// Template variables for the generic HTML page
    pub defs: Map<String, Value>,

    /// View rendered for HTML clients
    pub template: String,
}

impl Default for ErrorResponderConfig {
    fn default() -> Self {
        Self {
            show_stack: false,
            show_message: false,
            dump_exceptions: false,
            log_errors: None,
            defs: Map::new(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl ErrorResponderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `ERROR_*` keys
    pub fn from_config_service(config: &ConfigService) -> Self {
        let log_errors = config
            .get(LOG_FILE_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let template = config
            .get(TEMPLATE_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        Self {
            show_stack: config.get_flag(SHOW_STACK_KEY),
            show_message: config.get_flag(SHOW_MESSAGE_KEY),
            dump_exceptions: config.get_flag(DUMP_EXCEPTIONS_KEY),
            log_errors,
            defs: Map::new(),
            template,
        }
    }

    /// Build a configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_config_service(&ConfigService::new())
    }

    pub fn show_stack(mut self, enabled: bool) -> Self {
        self.show_stack = enabled;
        self
    }

    pub fn show_message(mut self, enabled: bool) -> Self {
        self.show_message = enabled;
        self
    }

    pub fn dump_exceptions(mut self, enabled: bool) -> Self {
        self.dump_exceptions = enabled;
        self
    }

    pub fn log_errors(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_errors = Some(path.into());
        self
    }

    pub fn defs(mut self, defs: Map<String, Value>) -> Self {
        self.defs = defs;
        self
    }

    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template = name.into();
        self
    }

    /// Whether error details are exposed to the client
    pub fn is_detailed(&self) -> bool {
        self.show_stack || self.show_message
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogTarget {
    Path(PathBuf),
    Disabled(IgnoredAny),
}

fn deserialize_log_target<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let target = Option::<LogTarget>::deserialize(deserializer)?;
    Ok(match target {
        Some(LogTarget::Path(path)) if !path.as_os_str().is_empty() => Some(path),
        Some(LogTarget::Path(_) | LogTarget::Disabled(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_disabled() {
        let config = ErrorResponderConfig::default();
        assert!(!config.show_stack);
        assert!(!config.show_message);
        assert!(!config.dump_exceptions);
        assert!(config.log_errors.is_none());
        assert!(config.defs.is_empty());
        assert_eq!(config.template, "error.html");
        assert!(!config.is_detailed());
    }

    #[test]
    fn test_from_config_service() {
        let service = ConfigService::default();
        service.set(SHOW_STACK_KEY, "TRUE");
        service.set(SHOW_MESSAGE_KEY, "nope");
        service.set(DUMP_EXCEPTIONS_KEY, "1");
        service.set(LOG_FILE_KEY, " /var/log/app-errors.log ");

        let config = ErrorResponderConfig::from_config_service(&service);
        assert!(config.show_stack);
        assert!(!config.show_message);
        assert!(config.dump_exceptions);
        assert_eq!(config.log_errors, Some(PathBuf::from("/var/log/app-errors.log")));
        assert_eq!(config.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_empty_log_file_disables_logging() {
        let service = ConfigService::default();
        service.set(LOG_FILE_KEY, "");
        service.set(TEMPLATE_KEY, "500.html");

        let config = ErrorResponderConfig::from_config_service(&service);
        assert!(config.log_errors.is_none());
        assert_eq!(config.template, "500.html");
    }

    #[test]
    fn test_deserialize_camel_case_options() {
        let config: ErrorResponderConfig = serde_json::from_value(json!({
            "showMessage": true,
            "logErrors": false,
            "defs": { "title": "Something broke" }
        }))
        .unwrap();

        assert!(config.show_message);
        assert!(config.is_detailed());
        assert!(config.log_errors.is_none());
        assert_eq!(config.defs["title"], json!("Something broke"));
    }

    #[test]
    fn test_deserialize_log_path() {
        let config: ErrorResponderConfig =
            serde_json::from_value(json!({ "log_errors": "logs/errors.log" })).unwrap();
        assert_eq!(config.log_errors, Some(PathBuf::from("logs/errors.log")));

        let enabled_flag: ErrorResponderConfig =
            serde_json::from_value(json!({ "logErrors": true })).unwrap();
        assert!(enabled_flag.log_errors.is_none());

        let null: ErrorResponderConfig =
            serde_json::from_value(json!({ "logErrors": null })).unwrap();
        assert!(null.log_errors.is_none());

        let empty: ErrorResponderConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, ErrorResponderConfig::default());
    }
}
