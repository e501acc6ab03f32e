//! Mock query service for testing.
//!
//! Replays a scripted sequence of statuses and a canned result set, and
//! records every call so tests can assert on call counts and requests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    ExecutionHandle, ExecutionState, ExecutionStatus, QueryRequest, QueryService, ResultRow,
    ResultSet,
};
use crate::error::{CurError, Result};

/// Execution id handed out by the mock.
pub const MOCK_EXECUTION_ID: &str = "mock-execution-0001";

/// A query service that returns predefined responses.
///
/// Statuses are consumed in order; once only one remains it is repeated
/// for every further status call.
#[derive(Debug)]
pub struct MockQueryService {
    statuses: Mutex<VecDeque<ExecutionStatus>>,
    results: ResultSet,
    submit_error: Option<String>,
    status_error: Option<String>,
    results_error: Option<String>,
    submitted: Mutex<Vec<QueryRequest>>,
    status_calls: Mutex<u32>,
    results_calls: Mutex<u32>,
}

impl MockQueryService {
    /// Creates a mock whose query succeeds immediately with an empty result.
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::from([ExecutionStatus::new(
                ExecutionState::Succeeded,
            )])),
            results: ResultSet::default(),
            submit_error: None,
            status_error: None,
            results_error: None,
            submitted: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
            results_calls: Mutex::new(0),
        }
    }

    /// Sets the status sequence returned by successive status calls.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ExecutionStatus>) -> Self {
        self.statuses = Mutex::new(statuses.into_iter().collect());
        self
    }

    /// Shorthand for `with_statuses` when no failure reasons are involved.
    pub fn with_states(self, states: &[ExecutionState]) -> Self {
        self.with_statuses(states.iter().copied().map(ExecutionStatus::new))
    }

    /// Sets the full result set, header row included.
    pub fn with_results(mut self, results: ResultSet) -> Self {
        self.results = results;
        self
    }

    /// Sets a two-column cost result whose aggregate cell holds `value`.
    pub fn with_cost_cell(self, value: &str) -> Self {
        self.with_results(ResultSet::new(vec![
            ResultRow::from_strs(&["line_item_product_code", "sum_unblended_cost"]),
            ResultRow::from_strs(&["AmazonS3", value]),
        ]))
    }

    /// Makes the submission call fail with the given message.
    pub fn with_submit_error(mut self, msg: impl Into<String>) -> Self {
        self.submit_error = Some(msg.into());
        self
    }

    /// Makes every status call fail with the given message.
    pub fn with_status_error(mut self, msg: impl Into<String>) -> Self {
        self.status_error = Some(msg.into());
        self
    }

    /// Makes the results call fail with the given message.
    pub fn with_results_error(mut self, msg: impl Into<String>) -> Self {
        self.results_error = Some(msg.into());
        self
    }

    /// Returns every request passed to `start_query_execution`.
    pub fn submitted_requests(&self) -> Vec<QueryRequest> {
        lock(&self.submitted).clone()
    }

    /// Number of `get_query_execution` calls made so far.
    pub fn status_calls(&self) -> u32 {
        *lock(&self.status_calls)
    }

    /// Number of `get_query_results` calls made so far.
    pub fn results_calls(&self) -> u32 {
        *lock(&self.results_calls)
    }
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

// A poisoned lock only means another test thread panicked; the data is still usable.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionHandle> {
        lock(&self.submitted).push(request.clone());

        if let Some(msg) = &self.submit_error {
            return Err(CurError::submission(msg.clone()));
        }
        ExecutionHandle::new(MOCK_EXECUTION_ID)
    }

    async fn get_query_execution(&self, _handle: &ExecutionHandle) -> Result<ExecutionStatus> {
        *lock(&self.status_calls) += 1;

        if let Some(msg) = &self.status_error {
            return Err(CurError::poll_fetch(msg.clone()));
        }

        let mut statuses = lock(&self.statuses);
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        status.ok_or_else(|| CurError::poll_fetch("mock has no scripted status"))
    }

    async fn get_query_results(&self, _handle: &ExecutionHandle) -> Result<ResultSet> {
        *lock(&self.results_calls) += 1;

        if let Some(msg) = &self.results_error {
            return Err(CurError::result_fetch(msg.clone()));
        }
        Ok(self.results.clone())
    }
}
