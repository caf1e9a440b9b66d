//! Play-by-play audit trail.
//!
//! The log is the system of record for replay and postmortem analysis:
//! one `PlayByPlayAuditor` per game, append-only, queried read-only.

mod auditor;
mod entry;
mod export;

pub use auditor::{DriveEvent, PlayByPlayAuditor};
pub use entry::{AuditEntry, AuditEventType, ContextSnapshot, PerformanceTiming};
pub use export::{export_schema, ExportedAuditEntry};
