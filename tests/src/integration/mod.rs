//! # Integration Tests
//!
//! Multi-network validation flows exercising the full service surface.

pub mod approval_flows;
