//! Command-line argument parsing for cur-mean.
//!
//! Flags override the matching config file values; anything left unset
//! falls back to the file, then to the built-in defaults.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Computes the daily mean cost of an AWS service from its Cost & Usage Report via Athena.
#[derive(Parser, Debug)]
#[command(name = "cur-mean")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// AWS shared-config profile
    #[arg(short = 'p', long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// AWS region (defaults to the profile's region)
    #[arg(short = 'r', long, value_name = "REGION")]
    pub region: Option<String>,

    /// S3 URI for Athena query output
    #[arg(short = 'o', long, value_name = "S3_URI")]
    pub output_location: Option<String>,

    /// Cost & Usage Report table (table or database.table)
    #[arg(short = 't', long, value_name = "TABLE")]
    pub table: Option<String>,

    /// Product code to aggregate (e.g., AmazonS3)
    #[arg(short = 's', long, value_name = "SERVICE")]
    pub service: Option<String>,

    /// Start of the usage window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// End of the usage window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Divisor applied to the aggregate to get the mean
    #[arg(long, value_name = "DAYS")]
    pub divisor: Option<f64>,

    /// Seconds between status checks
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Give up after this many status checks
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Fail when the result cell is not a number instead of reporting 0
    #[arg(long)]
    pub strict: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the generated SQL and exit without contacting AWS
    #[arg(long)]
    pub print_query: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Overlays the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(profile) = &self.profile {
            config.aws.profile = profile.clone();
        }
        if let Some(region) = &self.region {
            config.aws.region = Some(region.clone());
        }
        if let Some(location) = &self.output_location {
            config.query.output_location = location.clone();
        }
        if let Some(table) = &self.table {
            config.query.table = table.clone();
        }
        if let Some(service) = &self.service {
            config.query.service = service.clone();
        }
        if let Some(start) = &self.start_date {
            config.query.start_date = start.clone();
        }
        if let Some(end) = &self.end_date {
            config.query.end_date = end.clone();
        }
        if let Some(divisor) = self.divisor {
            config.extract.divisor = divisor;
        }
        if let Some(interval) = self.poll_interval {
            config.poll.interval_secs = interval;
        }
        if let Some(max) = self.max_attempts {
            config.poll.max_attempts = Some(max);
        }
        if self.strict {
            config.extract.strict = true;
        }
    }
}
