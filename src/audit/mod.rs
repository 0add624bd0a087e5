//! Audit logging for warikan
//!
//! Every create, update and delete performed through the services is
//! appended to `audit.log` as one JSON object per line.
//!
//! - `AuditEntry`: timestamp, operation, entity and before/after state
//! - `AuditLogger`: appends to and reads back the JSONL file
//! - `generate_diff`: one-line summary of the fields an update changed

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
