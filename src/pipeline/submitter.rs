//! Query submission phase.

use tracing::{debug, error};

use crate::athena::{ExecutionHandle, QueryRequest, QueryService};
use crate::error::Result;

/// Starts execution of `request` and returns the execution handle.
///
/// The query text is forwarded untouched, empty or not. Errors from the
/// service are propagated as they are; nothing is retried.
pub async fn submit_query(
    service: &dyn QueryService,
    request: &QueryRequest,
) -> Result<ExecutionHandle> {
    debug!(
        "Submitting query ({} bytes) with output location {}",
        request.query().len(),
        request.output_location()
    );

    let handle = service.start_query_execution(request).await.map_err(|e| {
        error!("StartQueryExecution failed: {}", e);
        e
    })?;

    debug!("Query accepted with execution id {}", handle);
    Ok(handle)
}
