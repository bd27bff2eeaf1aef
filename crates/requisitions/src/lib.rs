//! `depot-requisitions` — the upstream demand link.
//!
//! A requisition (purchase request) lives mostly outside the reconciliation
//! engine; the engine only reads it to validate existence and pushes its
//! status forward/backward as receptions are created, edited or deleted.

pub mod requisition;

pub use requisition::{Requisition, RequisitionId, RequisitionStatus};
