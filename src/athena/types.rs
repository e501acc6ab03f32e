//! Types exchanged with the query service.
//!
//! Mirrors the small slice of the Athena request/response contract the
//! pipeline depends on.

use crate::error::{CurError, Result};
use std::fmt;

/// Opaque identifier of a submitted query execution.
///
/// Never empty: the only constructor rejects empty identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    /// Wraps a service-provided execution id.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CurError::internal("execution handle must not be empty"));
        }
        Ok(Self(id))
    }

    /// Returns the raw execution id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Parses the service's state string (e.g. "RUNNING").
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QUEUED" => Some(Self::Queued),
            "RUNNING" => Some(Self::Running),
            "SUCCEEDED" => Some(Self::Succeeded),
            "FAILED" => Some(Self::Failed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns the service's spelling of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true once no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Running)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status snapshot returned by "get execution status".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,

    /// Reason for the last state change; set by the service on failure.
    pub reason: Option<String>,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            reason: None,
        }
    }

    /// Creates a FAILED status with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            state: ExecutionState::Failed,
            reason: Some(reason.into()),
        }
    }
}

/// A query to submit: SQL text plus the S3 location for its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    query: String,
    output_location: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, output_location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output_location: output_location.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn output_location(&self) -> &str {
        &self.output_location
    }
}

/// One row of a result set. `None` cells are SQL NULLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub cells: Vec<Option<String>>,
}

impl ResultRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Builds a row where every cell is present.
    pub fn from_strs(cells: &[&str]) -> Self {
        Self {
            cells: cells.iter().map(|c| Some((*c).to_string())).collect(),
        }
    }
}

/// Tabular query output. Row 0 carries the column headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub rows: Vec<ResultRow>,
}

impl ResultSet {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// Returns the cell at `(row, column)`, or `None` when the position is
    /// out of range or the cell is NULL.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Number of data rows, excluding the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}
