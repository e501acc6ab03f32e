//! cur-mean - daily mean cost of an AWS service, computed with Athena.
//!
//! This library exposes the core modules for use by the binary and the
//! integration tests.

pub mod athena;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod query;
