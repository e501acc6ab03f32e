//! End-to-end pipeline tests.
//!
//! Exercise submit → wait → fetch with scripted service responses.

use std::time::Duration;

use cur_mean::athena::{ExecutionState, ExecutionStatus, MockQueryService, QueryRequest};
use cur_mean::config::Config;
use cur_mean::error::CurError;
use cur_mean::pipeline::{self, ParsePolicy, PipelineSettings, RecordingSleeper};
use cur_mean::query::CostQuery;
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

fn default_request() -> QueryRequest {
    let config = Config::default();
    CostQuery::from_config(&config.query).to_request(&config.query.output_location)
}

#[tokio::test]
async fn test_stock_report_prints_mean() {
    let mock = MockQueryService::new()
        .with_states(&[
            ExecutionState::Queued,
            ExecutionState::Running,
            ExecutionState::Succeeded,
        ])
        .with_cost_cell("300");
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let report = assert_ok!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Initialized & submitted query for query ID: mock-execution-0001\n\
         Mean value = 10.00\n"
    );
    assert_eq!(report.total, 300.0);
    assert_eq!(mock.status_calls(), 3);
    assert_eq!(mock.results_calls(), 1);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(10); 2]);
}

#[tokio::test]
async fn test_submitted_request_matches_config() {
    let mock = MockQueryService::new().with_cost_cell("60");
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    assert_ok!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );

    let submitted = mock.submitted_requests();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].output_location(),
        "s3://report-bucket-aqfer/CURfile/query-result/"
    );
    assert!(submitted[0]
        .query()
        .contains("line_item_product_code='AmazonS3'"));
}

#[tokio::test]
async fn test_submission_error_stops_pipeline() {
    let mock = MockQueryService::new().with_submit_error("AccessDeniedException");
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let err = assert_err!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );

    assert!(matches!(err, CurError::Submission(_)));
    assert_eq!(mock.status_calls(), 0);
    assert_eq!(mock.results_calls(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_failed_execution_reports_reason() {
    let mock = MockQueryService::new().with_statuses([
        ExecutionStatus::new(ExecutionState::Running),
        ExecutionStatus::failed("HIVE_BAD_DATA: Error parsing field value"),
    ]);
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let err = assert_err!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );

    assert_eq!(
        err.to_string(),
        "Query encountered an error: HIVE_BAD_DATA: Error parsing field value"
    );
    assert_eq!(mock.results_calls(), 0);
}

#[tokio::test]
async fn test_poll_fetch_error_stops_pipeline() {
    let mock = MockQueryService::new().with_status_error("timeout");
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let err = assert_err!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );

    assert!(matches!(err, CurError::PollFetch(_)));
    assert_eq!(mock.results_calls(), 0);
}

#[tokio::test]
async fn test_unparsable_cell_lenient_vs_strict() {
    let mock = MockQueryService::new().with_cost_cell("n/a");
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let report = assert_ok!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::default(),
            &mut out,
        )
        .await
    );
    assert!(!report.parsed);
    assert!(String::from_utf8(out)
        .unwrap()
        .ends_with("Mean value = 0.00\n"));

    let mock = MockQueryService::new().with_cost_cell("n/a");
    let mut settings = PipelineSettings::default();
    settings.extract.parse_policy = ParsePolicy::Strict;
    let mut out = Vec::new();

    let err = assert_err!(
        pipeline::run(&mock, &sleeper, &default_request(), settings, &mut out).await
    );
    assert!(matches!(err, CurError::ResultExtraction(_)));
}

#[tokio::test]
async fn test_max_attempts_from_config() {
    let mut config = Config::default();
    config.poll.interval_secs = 1;
    config.poll.max_attempts = Some(3);

    let mock = MockQueryService::new().with_states(&[ExecutionState::Queued]);
    let sleeper = RecordingSleeper::new();
    let mut out = Vec::new();

    let err = assert_err!(
        pipeline::run(
            &mock,
            &sleeper,
            &default_request(),
            PipelineSettings::from(&config),
            &mut out,
        )
        .await
    );

    assert!(matches!(err, CurError::PollTimeout { attempts: 3 }));
    assert_eq!(sleeper.total(), Duration::from_secs(2));
}
