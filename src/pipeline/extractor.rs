//! Result extraction phase.
//!
//! Reads the aggregate cost cell from a finished execution and prints the
//! mean over the configured number of days.

use std::fmt;
use std::io::Write;

use tracing::{debug, warn};

use crate::athena::{ExecutionHandle, QueryService, ResultSet};
use crate::config::ExtractConfig;
use crate::error::{CurError, Result};

/// Row of the aggregate value. Row 0 is the header.
pub const VALUE_ROW: usize = 1;

/// Column of the aggregate value (`sum_unblended_cost`).
pub const VALUE_COLUMN: usize = 1;

/// What to do when the cell is missing or not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Log a warning, treat the value as 0, and carry on.
    #[default]
    Lenient,
    /// Fail with `CurError::ResultExtraction`.
    Strict,
}

/// Settings for the extraction phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractSettings {
    pub divisor: f64,
    pub parse_policy: ParsePolicy,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            divisor: 30.0,
            parse_policy: ParsePolicy::Lenient,
        }
    }
}

impl From<&ExtractConfig> for ExtractSettings {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            divisor: config.divisor,
            parse_policy: if config.strict {
                ParsePolicy::Strict
            } else {
                ParsePolicy::Lenient
            },
        }
    }
}

/// The computed statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanReport {
    /// Aggregate read from the result set (0 when it could not be parsed).
    pub total: f64,
    pub divisor: f64,
    pub mean: f64,
    /// False when the cell was missing or unparsable and `total` defaulted.
    pub parsed: bool,
}

impl fmt::Display for MeanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mean value = {:.2}", self.mean)
    }
}

/// Fetches the results of `handle`, computes the mean and writes it to `out`.
pub async fn extract_mean(
    service: &dyn QueryService,
    handle: &ExecutionHandle,
    settings: ExtractSettings,
    out: &mut dyn Write,
) -> Result<MeanReport> {
    let results = service.get_query_results(handle).await?;
    debug!("Fetched {} data rows for {}", results.data_row_count(), handle);

    let report = compute_mean(&results, settings)?;

    writeln!(out, "{report}")
        .map_err(|e| CurError::internal(format!("Failed to write output: {e}")))?;

    Ok(report)
}

/// Parses the value cell and divides it by the configured divisor.
pub fn compute_mean(results: &ResultSet, settings: ExtractSettings) -> Result<MeanReport> {
    let (total, parsed) = match parse_value_cell(results) {
        Ok(total) => (total, true),
        Err(msg) => match settings.parse_policy {
            ParsePolicy::Strict => return Err(CurError::result_extraction(msg)),
            ParsePolicy::Lenient => {
                warn!("{}; reporting 0", msg);
                (0.0, false)
            }
        },
    };

    Ok(MeanReport {
        total,
        divisor: settings.divisor,
        mean: total / settings.divisor,
        parsed,
    })
}

fn parse_value_cell(results: &ResultSet) -> std::result::Result<f64, String> {
    let raw = results.cell(VALUE_ROW, VALUE_COLUMN).ok_or_else(|| {
        format!("no value at row {VALUE_ROW}, column {VALUE_COLUMN} of the result set")
    })?;

    // No trimming: padded values like " 300 " are not numbers.
    raw.parse::<f64>()
        .map_err(|e| format!("cannot parse '{raw}' as a number: {e}"))
}
