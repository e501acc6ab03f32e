//! Query service abstraction for cur-mean.
//!
//! Provides a trait-based interface over the three remote operations the
//! pipeline consumes, so the Athena client and the in-memory mock can be
//! used interchangeably.

mod client;
mod mock;
mod types;

pub use client::AthenaQueryService;
pub use mock::MockQueryService;
pub use types::{
    ExecutionHandle, ExecutionState, ExecutionStatus, QueryRequest, ResultRow, ResultSet,
};

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the remote query service contract.
///
/// Implementations map their transport errors onto the matching
/// `CurError` variant for the operation that failed.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Starts asynchronous execution of the query and returns its handle.
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<ExecutionHandle>;

    /// Fetches the current status of an execution.
    async fn get_query_execution(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus>;

    /// Fetches the result set of a completed execution.
    async fn get_query_results(&self, handle: &ExecutionHandle) -> Result<ResultSet>;
}
