//! Configuration management.
//!
//! Tokenizer settings live in [`CsvDialect`]; the record layer's own switches
//! live in [`ReaderConfig`] and [`WriterConfig`]. [`CsvRecordConfig`] bundles
//! them with logging settings and loads from TOML.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::{Error, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CSVRECORD_CONFIG_PATH";

/// Tokenizer-level settings, applied to the underlying CSV reader or writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDialect {
    /// Field delimiter. Default: `,`.
    pub delimiter: u8,
    /// Quote character. Default: `"`.
    pub quote: u8,
    /// Escape character inside quoted fields. Default: none (doubled quotes).
    pub escape: Option<u8>,
    /// Lines starting with this byte are skipped on read. Default: none.
    pub comment: Option<u8>,
    /// Accept rows whose length differs from the header row.
    ///
    /// When `false`, the tokenizer rejects short and long rows alike. When
    /// `true`, short rows become partial records and columns past the header
    /// are ignored.
    pub flexible: bool,
    /// Strip leading spaces and tabs from every field on read.
    pub trim_leading_space: bool,
    /// Terminate written rows with `\r\n` instead of `\n`.
    pub crlf: bool,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            escape: None,
            comment: None,
            flexible: false,
            trim_leading_space: false,
            crlf: false,
        }
    }
}

impl CsvDialect {
    /// Creates the default comma-separated dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tab-separated dialect.
    #[must_use]
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }

    /// Sets the delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets row-length leniency.
    #[must_use]
    pub const fn with_flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Sets leading-space trimming.
    #[must_use]
    pub const fn with_trim_leading_space(mut self, trim: bool) -> Self {
        self.trim_leading_space = trim;
        self
    }

    /// Sets the comment character.
    #[must_use]
    pub const fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }
}

/// What to do when a header names the same field twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateFieldPolicy {
    /// Keep going; the later column wins lookups by name. A warning is logged.
    #[default]
    LastWins,
    /// Fail construction with [`Error::DuplicateField`].
    Reject,
}

impl DuplicateFieldPolicy {
    /// Parses a policy name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "last_wins" | "last-wins" | "lastwins" | "allow" => Some(Self::LastWins),
            "reject" | "error" | "deny" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LastWins => "last_wins",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for DuplicateFieldPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown duplicate field policy: {s}")))
    }
}

/// Record reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderConfig {
    /// Tokenizer settings (used when the reader builds its own CSV source).
    pub dialect: CsvDialect,
    /// Strip trailing spaces and tabs from header names and every value.
    pub trim_trailing_space: bool,
    /// Policy for repeated header names.
    pub duplicate_fields: DuplicateFieldPolicy,
}

impl ReaderConfig {
    /// Creates the default reader configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets trailing-space trimming.
    #[must_use]
    pub const fn with_trim_trailing_space(mut self, trim: bool) -> Self {
        self.trim_trailing_space = trim;
        self
    }

    /// Sets the duplicate field policy.
    #[must_use]
    pub const fn with_duplicate_fields(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicate_fields = policy;
        self
    }
}

/// Record writer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterConfig {
    /// Tokenizer settings (used when the writer builds its own CSV sink).
    pub dialect: CsvDialect,
    /// Drop record keys missing from the field list instead of failing.
    pub allow_unknown: bool,
    /// Policy for repeated names in the field list.
    pub duplicate_fields: DuplicateFieldPolicy,
}

impl WriterConfig {
    /// Creates the default (strict) writer configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dialect.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets lenient handling of unknown fields.
    #[must_use]
    pub const fn with_allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Sets the duplicate field policy.
    #[must_use]
    pub const fn with_duplicate_fields(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicate_fields = policy;
        self
    }
}

/// Full configuration for csvrecord.
#[derive(Debug, Clone, Default)]
pub struct CsvRecordConfig {
    /// Shared tokenizer settings.
    pub dialect: CsvDialect,
    /// Reader settings. Its dialect mirrors `dialect`.
    pub reader: ReaderConfig,
    /// Writer settings. Its dialect mirrors `dialect`.
    pub writer: WriterConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Dialect section.
    pub dialect: Option<ConfigFileDialect>,
    /// Reader section.
    pub reader: Option<ConfigFileReader>,
    /// Writer section.
    pub writer: Option<ConfigFileWriter>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Dialect section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDialect {
    /// Delimiter, one ASCII character or `tab`.
    pub delimiter: Option<String>,
    /// Quote character.
    pub quote: Option<String>,
    /// Escape character.
    pub escape: Option<String>,
    /// Comment character.
    pub comment: Option<String>,
    /// Row-length leniency.
    pub flexible: Option<bool>,
    /// Leading-space trimming.
    pub trim_leading_space: Option<bool>,
    /// CRLF line endings on write.
    pub crlf: Option<bool>,
}

/// Reader section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileReader {
    /// Trailing-space trimming.
    pub trim_trailing_space: Option<bool>,
    /// Duplicate field policy name.
    pub duplicate_fields: Option<String>,
}

/// Writer section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileWriter {
    /// Lenient unknown-field handling.
    pub allow_unknown: Option<bool>,
    /// Duplicate field policy name.
    pub duplicate_fields: Option<String>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `csvrecord=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
}

impl CsvRecordConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is malformed.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `CSVRECORD_CONFIG_PATH`, then the platform config dir
    /// (`<config_dir>/csvrecord/config.toml`). Returns defaults when neither
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load_default() -> Result<Self> {
        if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
            if !config_path.trim().is_empty() {
                return Self::load_from_file(Path::new(&config_path));
            }
        }

        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let platform_config = base_dirs.config_dir().join("csvrecord").join("config.toml");
        if platform_config.exists() {
            return Self::load_from_file(&platform_config);
        }

        Ok(Self::default())
    }

    /// Converts a `ConfigFile` to `CsvRecordConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dialect) = file.dialect {
            if let Some(v) = dialect.delimiter {
                config.dialect.delimiter = parse_byte("delimiter", &v)?;
            }
            if let Some(v) = dialect.quote {
                config.dialect.quote = parse_byte("quote", &v)?;
            }
            if let Some(v) = dialect.escape {
                config.dialect.escape = Some(parse_byte("escape", &v)?);
            }
            if let Some(v) = dialect.comment {
                config.dialect.comment = Some(parse_byte("comment", &v)?);
            }
            if let Some(v) = dialect.flexible {
                config.dialect.flexible = v;
            }
            if let Some(v) = dialect.trim_leading_space {
                config.dialect.trim_leading_space = v;
            }
            if let Some(v) = dialect.crlf {
                config.dialect.crlf = v;
            }
        }
        if let Some(reader) = file.reader {
            if let Some(v) = reader.trim_trailing_space {
                config.reader.trim_trailing_space = v;
            }
            if let Some(v) = reader.duplicate_fields {
                config.reader.duplicate_fields = v.parse()?;
            }
        }
        if let Some(writer) = file.writer {
            if let Some(v) = writer.allow_unknown {
                config.writer.allow_unknown = v;
            }
            if let Some(v) = writer.duplicate_fields {
                config.writer.duplicate_fields = v.parse()?;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config.set_dialect(config.dialect);
        Ok(config)
    }

    /// Replaces the dialect everywhere it is carried.
    pub const fn set_dialect(&mut self, dialect: CsvDialect) {
        self.dialect = dialect;
        self.reader.dialect = dialect;
        self.writer.dialect = dialect;
    }
}

/// Parses a single-byte dialect option.
///
/// Accepts one ASCII character, or the names `tab` / `\t`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything else.
pub fn parse_byte(option: &str, value: &str) -> Result<u8> {
    if matches!(value, "tab" | "\\t") {
        return Ok(b'\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(Error::InvalidInput(format!(
            "{option} must be a single ASCII character, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsvRecordConfig::new();
        assert_eq!(config.dialect.delimiter, b',');
        assert!(!config.dialect.flexible);
        assert!(!config.reader.trim_trailing_space);
        assert!(!config.writer.allow_unknown);
        assert_eq!(config.reader.duplicate_fields, DuplicateFieldPolicy::LastWins);
    }

    #[test]
    fn test_from_toml() {
        let config = CsvRecordConfig::from_toml(
            r##"
[dialect]
delimiter = "tab"
comment = "#"
flexible = true
trim_leading_space = true

[reader]
trim_trailing_space = true
duplicate_fields = "reject"

[writer]
allow_unknown = true

[logging]
level = "debug"
format = "json"
"##,
        )
        .unwrap();

        assert_eq!(config.dialect.delimiter, b'\t');
        assert_eq!(config.dialect.comment, Some(b'#'));
        assert!(config.dialect.flexible);
        assert_eq!(config.reader.dialect, config.dialect);
        assert_eq!(config.writer.dialect, config.dialect);
        assert!(config.reader.trim_trailing_space);
        assert_eq!(config.reader.duplicate_fields, DuplicateFieldPolicy::Reject);
        assert!(config.writer.allow_unknown);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_from_toml_rejects_bad_delimiter() {
        let err = CsvRecordConfig::from_toml("[dialect]\ndelimiter = \";;\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_from_toml_rejects_bad_policy() {
        let err = CsvRecordConfig::from_toml("[reader]\nduplicate_fields = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = CsvRecordConfig::load_from_file(Path::new("/nonexistent/csvrecord.toml"))
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("delimiter", ";").unwrap(), b';');
        assert_eq!(parse_byte("delimiter", "\\t").unwrap(), b'\t');
        assert_eq!(parse_byte("delimiter", "tab").unwrap(), b'\t');
        assert!(parse_byte("delimiter", "").is_err());
        assert!(parse_byte("delimiter", "é").is_err());
    }

    #[test]
    fn test_duplicate_policy_parse() {
        assert_eq!(
            "Reject".parse::<DuplicateFieldPolicy>().unwrap(),
            DuplicateFieldPolicy::Reject
        );
        assert_eq!(
            DuplicateFieldPolicy::parse("last-wins"),
            Some(DuplicateFieldPolicy::LastWins)
        );
        assert_eq!(DuplicateFieldPolicy::Reject.as_str(), "reject");
    }
}
