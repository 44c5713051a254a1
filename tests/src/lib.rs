//! # CrossNet Approvals Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! ├── fixtures/         # Off-chain tooling stand-ins: tree builder, signing
//! └── integration/      # Multi-network validation flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p xn-tests
//! cargo test -p xn-tests integration::
//! ```

pub mod fixtures;
pub mod integration;

/// Install a default tracing subscriber for a test run (best effort; later
/// calls are no-ops).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}
