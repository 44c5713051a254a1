//! # Ports
//!
//! Hexagonal boundary of the subsystem: the inbound API trait and the
//! outbound environment/audit traits, with mock implementations beside
//! them.

pub mod inbound;
pub mod outbound;

pub use inbound::ApprovalValidationApi;
pub use outbound::{
    AuditSink, BufferedAuditSink, ChainEnvironment, EnvironmentError, MockChainEnvironment,
    NullAuditSink,
};
