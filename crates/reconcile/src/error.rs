use thiserror::Error;

use depot_core::DomainError;
use depot_distribution::DistributionId;
use depot_inventory::InventoryItemId;
use depot_receiving::ReceptionId;
use depot_requisitions::RequisitionId;

/// Engine-level error taxonomy, layered over [`DomainError`].
///
/// Every variant is surfaced to the caller as-is; the engine neither retries
/// nor swallows. A failed operation leaves no partial effect (the unit of
/// work rolls back as a whole).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("inventory item {0} not found")]
    ItemNotFound(InventoryItemId),

    #[error("reception {0} not found")]
    ReceptionNotFound(ReceptionId),

    #[error("distribution {0} not found")]
    DistributionNotFound(DistributionId),

    #[error("requisition {0} not found")]
    RequisitionNotFound(RequisitionId),

    /// A decrement would drive stock below zero. Carries enough context for
    /// the caller to render a precise message.
    #[error("insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: InventoryItemId,
        available: i64,
        requested: i64,
    },

    /// Deterministic domain failure (validation, invariant, conflict),
    /// raised before any lookup or mutation where possible.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The unit of work could not commit after mutation began. Fatal to the
    /// operation (never a partial commit), not to the process.
    #[error("consistency violation: {0}")]
    Consistency(String),
}
