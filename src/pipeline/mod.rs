//! The submit → wait → fetch pipeline.
//!
//! Each phase is a thin wrapper over one remote call. Phases run strictly in
//! order and the first error aborts the rest.

pub mod extractor;
pub mod poller;
pub mod sleeper;
pub mod submitter;

pub use extractor::{compute_mean, extract_mean, ExtractSettings, MeanReport, ParsePolicy};
pub use poller::{await_completion, PollPolicy};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use submitter::submit_query;

use std::io::Write;

use tracing::info;

use crate::athena::{QueryRequest, QueryService};
use crate::config::Config;
use crate::error::{CurError, Result};

/// Per-run settings for the polling and extraction phases.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineSettings {
    pub poll: PollPolicy,
    pub extract: ExtractSettings,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll: PollPolicy::from(&config.poll),
            extract: ExtractSettings::from(&config.extract),
        }
    }
}

/// Submits `request`, waits for it to finish and writes the mean to `out`.
pub async fn run(
    service: &dyn QueryService,
    sleeper: &dyn Sleeper,
    request: &QueryRequest,
    settings: PipelineSettings,
    out: &mut dyn Write,
) -> Result<MeanReport> {
    let handle = submit_query(service, request).await?;
    writeln!(out, "Initialized & submitted query for query ID: {handle}")
        .map_err(|e| CurError::internal(format!("Failed to write output: {e}")))?;

    let status = await_completion(service, sleeper, &handle, settings.poll).await?;
    info!("Execution {} finished with state {}", handle, status.state);

    let report = extract_mean(service, &handle, settings.extract, out).await?;
    info!(
        "Aggregate {:.2} over {} days, mean {:.2}",
        report.total, report.divisor, report.mean
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athena::{ExecutionState, MockQueryService};

    #[tokio::test]
    async fn test_run_full_pipeline() {
        let mock = MockQueryService::new()
            .with_states(&[ExecutionState::Running, ExecutionState::Succeeded])
            .with_cost_cell("300");
        let sleeper = RecordingSleeper::new();
        let request = QueryRequest::new("SELECT 1", "s3://bucket/out/");
        let mut out = Vec::new();

        let report = run(&mock, &sleeper, &request, PipelineSettings::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(report.mean, 10.0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Initialized & submitted query for query ID: mock-execution-0001\nMean value = 10.00\n"
        );
    }

    #[tokio::test]
    async fn test_failed_query_skips_result_fetch() {
        let mock = MockQueryService::new()
            .with_statuses([crate::athena::ExecutionStatus::failed("boom")])
            .with_cost_cell("300");
        let sleeper = RecordingSleeper::new();
        let request = QueryRequest::new("SELECT 1", "s3://bucket/out/");
        let mut out = Vec::new();

        let err = run(&mock, &sleeper, &request, PipelineSettings::default(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, CurError::Execution(_)));
        assert_eq!(mock.results_calls(), 0);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.poll.max_attempts = Some(4);
        config.extract.strict = true;

        let settings = PipelineSettings::from(&config);
        assert_eq!(settings.poll.max_attempts, Some(4));
        assert_eq!(settings.extract.parse_policy, ParsePolicy::Strict);
    }
}
