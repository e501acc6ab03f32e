//! Execution polling phase.
//!
//! Blocks until the execution reaches a terminal state, checking its status
//! at a fixed interval.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::sleeper::Sleeper;
use crate::athena::{ExecutionHandle, ExecutionState, ExecutionStatus, QueryService};
use crate::config::PollConfig;
use crate::error::{CurError, Result};

/// How often to check and when to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between consecutive status checks.
    pub interval: Duration,

    /// Maximum number of status checks; `None` polls until the query finishes.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        Self {
            interval: config.interval(),
            max_attempts: config.max_attempts,
        }
    }
}

/// Waits for `handle` to leave the QUEUED/RUNNING states.
///
/// Returns the terminal status for SUCCEEDED and CANCELLED. A FAILED query
/// becomes `CurError::Execution` with the service's reason. A failed status
/// call is returned immediately.
pub async fn await_completion(
    service: &dyn QueryService,
    sleeper: &dyn Sleeper,
    handle: &ExecutionHandle,
    policy: PollPolicy,
) -> Result<ExecutionStatus> {
    let mut attempts: u32 = 0;

    loop {
        let status = service.get_query_execution(handle).await?;
        attempts += 1;
        debug!("Status check {} for {}: {}", attempts, handle, status.state);

        if status.state.is_terminal() {
            info!("Query is complete!");
            match status.state {
                ExecutionState::Failed => {
                    let reason = status
                        .reason
                        .unwrap_or_else(|| "no reason provided".to_string());
                    return Err(CurError::execution(reason));
                }
                ExecutionState::Cancelled => {
                    warn!("Query {} was cancelled", handle);
                }
                _ => {}
            }
            return Ok(status);
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(CurError::PollTimeout { attempts });
            }
        }

        info!("Waiting for query to finish...");
        sleeper.sleep(policy.interval).await;
    }
}
