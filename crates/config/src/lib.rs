use anyhow::{Context, Result};
use config_rs::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Encodings the decoder understands
pub const SUPPORTED_ENCODINGS: &[&str] = &["json_v1"];

/// Output formats the CLI can render
pub const SUPPORTED_FORMATS: &[&str] = &["table", "json"];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Span decoding configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Rendering of decoded traces
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for span decoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Wire encoding of incoming bodies (default: "json_v1")
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Largest body accepted, in bytes (default: 10 MiB, 0 = unlimited)
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

/// Configuration for printing decoded traces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "table" or "json" (default: "table")
    #[serde(default = "default_format")]
    pub format: String,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

// Default value functions
fn default_encoding() -> String {
    "json_v1".to_string()
}

fn default_max_payload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            pretty: false,
        }
    }
}

impl Config {
    /// Load Config with layered configuration priority:
    /// 1. Default values
    /// 2. TOML file (if provided)
    /// 3. Environment variables (ZIPKIN_ prefix, `__` between section and key)
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            // Codec defaults
            .set_default("codec.encoding", default_encoding())?
            .set_default("codec.max_payload_bytes", default_max_payload_bytes() as u64)?
            // Output defaults
            .set_default("output.format", default_format())?
            .set_default("output.pretty", false)?;

        if let Some(file_path) = config_file {
            let path = Path::new(file_path);
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path));
        }

        // ZIPKIN_CODEC__ENCODING=json_v1, ZIPKIN_OUTPUT__FORMAT=json, ...
        builder = builder.add_source(
            Environment::with_prefix("ZIPKIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(config)
    }

    /// Load Config from a TOML file
    ///
    /// Environment variables can still override values from the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path
            .as_ref()
            .to_str()
            .context("Configuration path is not valid UTF-8")?;
        Self::load(Some(path))
    }

    /// Create a new Config from environment variables with defaults
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.codec.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

impl CodecConfig {
    /// Validate the codec configuration
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            SUPPORTED_ENCODINGS.contains(&self.encoding.as_str()),
            "Unsupported encoding '{}' (expected one of: {})",
            self.encoding,
            SUPPORTED_ENCODINGS.join(", ")
        );
        Ok(())
    }

    /// Whether a body of `size` bytes is within the configured limit
    pub fn accepts_payload(&self, size: usize) -> bool {
        self.max_payload_bytes == 0 || size <= self.max_payload_bytes
    }
}

impl OutputConfig {
    /// Validate the output configuration
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            SUPPORTED_FORMATS.contains(&self.format.as_str()),
            "Unsupported output format '{}' (expected one of: {})",
            self.format,
            SUPPORTED_FORMATS.join(", ")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.codec.encoding, "json_v1");
        assert_eq!(config.codec.max_payload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.output.format, "table");
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_with_defaults() {
        let config = Config::load(None).expect("Failed to load config");
        assert_eq!(config.codec.encoding, "json_v1");
        assert_eq!(config.output.format, "table");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("zipkin-codec-config-test.toml");
        std::fs::write(
            &path,
            "[codec]\nmax_payload_bytes = 1024\n\n[output]\nformat = \"json\"\npretty = true\n",
        )
        .expect("Failed to write config file");

        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config.codec.encoding, "json_v1");
        assert_eq!(config.codec.max_payload_bytes, 1024);
        assert_eq!(config.output.format, "json");
        assert!(config.output.pretty);
        assert!(config.validate().is_ok());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Some("/nonexistent/zipkin.toml")).is_err());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_encoding() {
        let mut config = Config::default();
        config.codec.encoding = "thrift".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_format() {
        let mut config = Config::default();
        config.output.format = "yaml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_payload() {
        let mut codec = CodecConfig::default();
        codec.max_payload_bytes = 4;
        assert!(codec.accepts_payload(4));
        assert!(!codec.accepts_payload(5));

        codec.max_payload_bytes = 0;
        assert!(codec.accepts_payload(usize::MAX));
    }
}
