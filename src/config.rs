//! Configuration management for cur-mean.
//!
//! Handles loading configuration from a TOML file. Every field defaults to
//! the value the tool has always used, so running without a config file
//! reproduces the stock report.

use crate::error::{CurError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration structure for cur-mean.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// AWS session settings.
    #[serde(default)]
    pub aws: AwsConfig,

    /// What to query and where Athena writes its output.
    #[serde(default)]
    pub query: QueryConfig,

    /// Status polling settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Result extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// AWS session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwsConfig {
    /// Named profile from the shared AWS config/credentials files.
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Region override. Falls back to the profile's region when unset.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_profile() -> String {
    "dev".to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            region: None,
        }
    }
}

/// Cost query configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Cost & Usage Report table, as `table` or `database.table`.
    #[serde(default = "default_table")]
    pub table: String,

    /// Product code to aggregate (e.g., "AmazonS3", "AmazonEC2").
    #[serde(default = "default_service")]
    pub service: String,

    /// Inclusive start of the usage window (YYYY-MM-DD).
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// End of the usage window (YYYY-MM-DD).
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// S3 URI where Athena writes query output.
    #[serde(default = "default_output_location")]
    pub output_location: String,
}

fn default_table() -> String {
    "athenacurcfn_a_w_s_c_u_r.varsh".to_string()
}

fn default_service() -> String {
    "AmazonS3".to_string()
}

fn default_start_date() -> String {
    "2022-03-01".to_string()
}

fn default_end_date() -> String {
    "2022-04-01".to_string()
}

fn default_output_location() -> String {
    "s3://report-bucket-aqfer/CURfile/query-result/".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            service: default_service(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            output_location: default_output_location(),
        }
    }
}

/// Polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollConfig {
    /// Seconds to sleep between status checks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of status checks. Unbounded when unset.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_interval_secs() -> u64 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Result extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractConfig {
    /// Divisor applied to the aggregate to get the mean (days in the window).
    #[serde(default = "default_divisor")]
    pub divisor: f64,

    /// Fail instead of warning when the result cell is not a number.
    #[serde(default)]
    pub strict: bool,
}

fn default_divisor() -> f64 {
    30.0
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            divisor: default_divisor(),
            strict: false,
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cur-mean")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CurError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            CurError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Checks values that serde cannot: formats, ranges, and URIs.
    pub fn validate(&self) -> Result<()> {
        if self.aws.profile.trim().is_empty() {
            return Err(CurError::config("aws.profile must not be empty"));
        }

        let date = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$")
            .map_err(|e| CurError::internal(format!("invalid date pattern: {e}")))?;
        for (field, value) in [
            ("query.start_date", &self.query.start_date),
            ("query.end_date", &self.query.end_date),
        ] {
            let valid = date.captures(value).is_some_and(|caps| {
                let year: u32 = caps[1].parse().unwrap_or(0);
                let month: u32 = caps[2].parse().unwrap_or(0);
                let day: u32 = caps[3].parse().unwrap_or(0);
                (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
            });
            if !valid {
                return Err(CurError::config(format!(
                    "{field} must be a calendar date in YYYY-MM-DD form, got '{value}'"
                )));
            }
        }
        // Lexicographic order matches calendar order for zero-padded dates.
        if self.query.start_date > self.query.end_date {
            return Err(CurError::config(format!(
                "query.start_date ({}) is after query.end_date ({})",
                self.query.start_date, self.query.end_date
            )));
        }

        let table = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .map_err(|e| CurError::internal(format!("invalid table pattern: {e}")))?;
        if !table.is_match(&self.query.table) {
            return Err(CurError::config(format!(
                "query.table must be 'table' or 'database.table', got '{}'",
                self.query.table
            )));
        }

        if self.query.service.trim().is_empty() {
            return Err(CurError::config("query.service must not be empty"));
        }

        validate_output_location(&self.query.output_location)?;

        if self.poll.interval_secs == 0 {
            return Err(CurError::config("poll.interval_secs must be at least 1"));
        }

        if self.poll.max_attempts == Some(0) {
            return Err(CurError::config("poll.max_attempts must be at least 1"));
        }

        if !self.extract.divisor.is_finite() || self.extract.divisor == 0.0 {
            return Err(CurError::config(format!(
                "extract.divisor must be a non-zero number, got {}",
                self.extract.divisor
            )));
        }

        Ok(())
    }
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Validates that the output location is an `s3://bucket/...` URI.
fn validate_output_location(location: &str) -> Result<()> {
    let url = Url::parse(location)
        .map_err(|e| CurError::config(format!("Invalid output location '{location}': {e}")))?;

    if url.scheme() != "s3" {
        return Err(CurError::config(format!(
            "Invalid output location scheme '{}'. Expected 's3'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(CurError::config(format!(
            "Output location '{location}' is missing a bucket name"
        )));
    }

    Ok(())
}
