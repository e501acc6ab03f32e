//! Amazon Athena implementation of `QueryService`.
//!
//! Uses aws-sdk-athena with credentials resolved from a named shared-config
//! profile.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::operation::get_query_results::GetQueryResultsOutput;
use aws_sdk_athena::operation::start_query_execution::StartQueryExecutionOutput;
use aws_sdk_athena::types::{QueryExecutionState, ResultConfiguration};
use aws_sdk_athena::Client;
use tracing::debug;

use super::{
    ExecutionHandle, ExecutionState, ExecutionStatus, QueryRequest, QueryService, ResultRow,
    ResultSet,
};
use crate::config::AwsConfig;
use crate::error::{CurError, Result};

/// Athena client held for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct AthenaQueryService {
    client: Client,
}

impl AthenaQueryService {
    /// Builds a client from the configured profile and optional region.
    pub async fn connect(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).profile_name(&config.profile);
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        debug!(
            "Athena client ready (profile: {}, region: {:?})",
            config.profile,
            sdk_config.region()
        );

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl QueryService for AthenaQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionHandle> {
        let result_conf = ResultConfiguration::builder()
            .output_location(request.output_location())
            .build();

        let output = self
            .client
            .start_query_execution()
            .query_string(request.query())
            .result_configuration(result_conf)
            .send()
            .await
            .map_err(|e| CurError::submission(DisplayErrorContext(&e).to_string()))?;

        handle_from_output(&output)
    }

    async fn get_query_execution(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| CurError::poll_fetch(DisplayErrorContext(&e).to_string()))?;

        let status = output
            .query_execution()
            .and_then(|execution| execution.status())
            .ok_or_else(|| CurError::poll_fetch(format!("no status returned for {handle}")))?;

        let raw_state = status
            .state()
            .ok_or_else(|| CurError::poll_fetch(format!("no state returned for {handle}")))?;

        Ok(ExecutionStatus {
            state: map_state(raw_state)?,
            reason: status.state_change_reason().map(String::from),
        })
    }

    async fn get_query_results(&self, handle: &ExecutionHandle) -> Result<ResultSet> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| CurError::result_fetch(DisplayErrorContext(&e).to_string()))?;

        Ok(result_set_from_output(&output))
    }
}

/// Extracts the execution handle from a start-execution response.
///
/// A missing or empty id is a submission failure.
fn handle_from_output(output: &StartQueryExecutionOutput) -> Result<ExecutionHandle> {
    let id = output
        .query_execution_id()
        .ok_or_else(|| CurError::submission("response did not include a query execution id"))?;

    ExecutionHandle::new(id)
        .map_err(|_| CurError::submission("service returned an empty query execution id"))
}

/// Converts the first page of results. A datum without a value is a NULL cell.
fn result_set_from_output(output: &GetQueryResultsOutput) -> ResultSet {
    let rows = output
        .result_set()
        .map(|set| {
            set.rows()
                .iter()
                .map(|row| {
                    ResultRow::new(
                        row.data()
                            .iter()
                            .map(|datum| datum.var_char_value().map(String::from))
                            .collect(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    ResultSet::new(rows)
}

fn map_state(state: &QueryExecutionState) -> Result<ExecutionState> {
    match state {
        QueryExecutionState::Queued => Ok(ExecutionState::Queued),
        QueryExecutionState::Running => Ok(ExecutionState::Running),
        QueryExecutionState::Succeeded => Ok(ExecutionState::Succeeded),
        QueryExecutionState::Failed => Ok(ExecutionState::Failed),
        QueryExecutionState::Cancelled => Ok(ExecutionState::Cancelled),
        other => ExecutionState::parse(other.as_str()).ok_or_else(|| {
            CurError::poll_fetch(format!("unrecognized execution state '{}'", other.as_str()))
        }),
    }
}
