//! Integration tests for cur-mean.

pub mod config_test;
pub mod pipeline_test;
