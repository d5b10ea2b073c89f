//! Arrival aggregation pipeline.
//!
//! Filters records by stop, counts distinct and low-seat buses per time
//! bucket, and reshapes the counts into the long form a multi-series chart
//! consumes.

pub mod aggregate;
pub mod filter;
pub mod pipeline;
pub mod reshape;
pub mod types;
