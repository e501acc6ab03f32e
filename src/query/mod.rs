//! Query construction for cur-mean.
//!
//! Builds the Cost & Usage Report aggregate that the pipeline submits.

pub mod builder;

pub use builder::CostQuery;
