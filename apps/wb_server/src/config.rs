use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use thiserror::Error;
use wb_protocol::{DEFAULT_MAX_MESSAGE_SIZE, EditorMode};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    IoError(String, #[source] std::io::Error),

    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Schema validation failed: {0}")]
    ValidationError(String),
}

/// Types loaded from JSON that must first pass their generated JSON Schema
pub trait Validatable: JsonSchema + for<'de> Deserialize<'de> {
    fn from_json_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_string(), e))?;

        Self::from_json_str(&content)
    }

    fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let schema = schemars::schema_for!(Self);
        let schema_json = serde_json::to_value(&schema)?;

        let compiled =
            jsonschema::validator_for(&schema_json).map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        compiled
            .validate(&value)
            .map_err(|e| ConfigError::ValidationError(format!("{}", e)))?;

        Ok(serde_json::from_value(value)?)
    }

    fn schema_json() -> Result<String> {
        let schema = schemars::schema_for!(Self);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// A byte count given as a number or as a string with a K, M or G suffix
///
/// Examples: 1024, "512K", "16M", "1G"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSize(pub usize);

impl ByteSize {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty string".to_string());
        }

        let (number, multiplier) = match s.char_indices().last() {
            Some((i, 'K' | 'k')) => (&s[..i], 1024usize),
            Some((i, 'M' | 'm')) => (&s[..i], 1024 * 1024),
            Some((i, 'G' | 'g')) => (&s[..i], 1024 * 1024 * 1024),
            _ => (s, 1),
        };

        let number: usize = number
            .trim()
            .parse()
            .map_err(|e| format!("Invalid number '{}': {}", number, e))?;

        Ok(ByteSize(number.saturating_mul(multiplier)))
    }

    pub fn as_bytes(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [(usize, &str); 3] = [(1024 * 1024 * 1024, "G"), (1024 * 1024, "M"), (1024, "K")];

        for (unit, suffix) in UNITS {
            if self.0 >= unit && self.0 % unit == 0 {
                return write!(f, "{}{}", self.0 / unit, suffix);
            }
        }
        write!(f, "{}", self.0)
    }
}

impl Serialize for ByteSize {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ByteSize {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ByteSizeVisitor;

        impl Visitor<'_> for ByteSizeVisitor {
            type Value = ByteSize;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a byte count or a string with a K/M/G suffix")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<ByteSize, E> {
                Ok(ByteSize(value as usize))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<ByteSize, E> {
                usize::try_from(value)
                    .map(ByteSize)
                    .map_err(|_| E::custom("byte size cannot be negative"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<ByteSize, E> {
                ByteSize::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(ByteSizeVisitor)
    }
}

impl JsonSchema for ByteSize {
    fn schema_name() -> String {
        "ByteSize".to_string()
    }

    fn json_schema(_gen: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};

        let mut schema = SchemaObject::default();
        schema.instance_type = Some(SingleOrVec::Vec(vec![InstanceType::String, InstanceType::Integer]));
        schema.metadata().description =
            Some("Byte size as a number or a string with suffix K, M or G (e.g. 1024, \"16M\")".to_string());
        Schema::Object(schema)
    }
}

/// Editor surface the in-memory host starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditorModeSetting {
    #[default]
    Edit,
    Game,
    NoWorldEditor,
}

impl From<EditorModeSetting> for EditorMode {
    fn from(setting: EditorModeSetting) -> Self {
        match setting {
            EditorModeSetting::Edit => EditorMode::Edit,
            EditorModeSetting::Game => EditorMode::Game,
            EditorModeSetting::NoWorldEditor => EditorMode::NoWorldEditor,
        }
    }
}

/// Bridge server configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Workbench Bridge Server Configuration")]
#[schemars(description = "Configuration for the workbench bridge server")]
pub struct Config {
    #[serde(default = "default_name")]
    #[schemars(description = "Human-readable server name sent in logs")]
    pub name: String,

    #[serde(default = "default_local_ip")]
    #[schemars(description = "IP address to bind the server (e.g., '127.0.0.1' for local tools only)")]
    pub local_ip: String,

    #[serde(default = "default_local_port")]
    #[schemars(description = "Port number for bridge connections", range(min = 1024, max = 65535))]
    pub local_port: u16,

    #[serde(default = "default_log_level")]
    #[schemars(description = "Log level: trace, debug, info, warn, error")]
    #[schemars(regex(pattern = r"^(trace|debug|info|warn|error)$"))]
    pub log_level: String,

    /// JSON scene loaded into the in-memory editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Path of a JSON scene document loaded at startup (empty scene if omitted)")]
    pub scene_path: Option<String>,

    #[serde(default = "default_max_message_size")]
    #[schemars(description = "Largest accepted or sent frame. Accepts numbers or strings with K/M/G suffix (default: 16M)")]
    pub max_message_size: ByteSize,

    #[serde(default)]
    #[schemars(description = "Editor mode of the in-memory host: edit, game or no_world_editor")]
    pub editor_mode: EditorModeSetting,
}

fn default_name() -> String {
    "Workbench Bridge".to_string()
}

fn default_local_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_local_port() -> u16 {
    5775
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_message_size() -> ByteSize {
    ByteSize(DEFAULT_MAX_MESSAGE_SIZE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            local_ip: default_local_ip(),
            local_port: default_local_port(),
            log_level: default_log_level(),
            scene_path: None,
            max_message_size: default_max_message_size(),
            editor_mode: EditorModeSetting::default(),
        }
    }
}

impl Validatable for Config {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.local_ip, "127.0.0.1");
        assert_eq!(config.local_port, 5775);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_message_size.as_bytes(), 16 * 1024 * 1024);
        assert_eq!(config.editor_mode, EditorModeSetting::Edit);
        assert!(config.scene_path.is_none());
    }

    #[test]
    fn test_valid_config() {
        let json = r#"{
            "name": "Test bridge",
            "local_ip": "0.0.0.0",
            "local_port": 6000,
            "log_level": "debug",
            "scene_path": "./scene.json",
            "max_message_size": "1M",
            "editor_mode": "game"
        }"#;

        let config = Config::from_json_str(json).unwrap();
        assert_eq!(config.local_port, 6000);
        assert_eq!(config.scene_path.as_deref(), Some("./scene.json"));
        assert_eq!(config.max_message_size.as_bytes(), 1024 * 1024);
        assert_eq!(EditorMode::from(config.editor_mode), EditorMode::Game);
    }

    #[test]
    fn test_invalid_log_level() {
        let result = Config::from_json_str(r#"{ "log_level": "verbose" }"#);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::from_json_str(r#"{ "local_port": 80 }"#).is_err());
        assert!(Config::from_json_str(r#"{ "local_port": 99999 }"#).is_err());
    }

    #[test]
    fn test_invalid_editor_mode() {
        assert!(Config::from_json_str(r#"{ "editor_mode": "play" }"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "local_port": 7001, "editor_mode": "no_world_editor" }}"#).unwrap();

        let config = Config::from_json_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.local_port, 7001);
        assert_eq!(config.editor_mode, EditorModeSetting::NoWorldEditor);

        let missing = Config::from_json_file("/nonexistent/wb_server.json");
        assert!(matches!(missing, Err(ConfigError::IoError(_, _))));
    }

    #[test]
    fn test_byte_size_parse() {
        assert_eq!(ByteSize::parse("1024").unwrap().as_bytes(), 1024);
        assert_eq!(ByteSize::parse(" 512k ").unwrap().as_bytes(), 512 * 1024);
        assert_eq!(ByteSize::parse("16M").unwrap().as_bytes(), 16 * 1024 * 1024);
        assert_eq!(ByteSize::parse("1G").unwrap().as_bytes(), 1024 * 1024 * 1024);

        assert!(ByteSize::parse("").is_err());
        assert!(ByteSize::parse("big").is_err());
        assert!(ByteSize::parse("10X").is_err());
    }

    #[test]
    fn test_byte_size_display() {
        assert_eq!(ByteSize(16 * 1024 * 1024).to_string(), "16M");
        assert_eq!(ByteSize(2048).to_string(), "2K");
        assert_eq!(ByteSize(1000).to_string(), "1000");
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = Config::schema_json().unwrap();
        assert!(schema.contains("max_message_size"));
        assert!(schema.contains("no_world_editor"));
    }
}
