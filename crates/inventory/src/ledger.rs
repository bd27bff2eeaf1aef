use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{ActorId, DomainError, DomainResult, RecordId};

use crate::item::InventoryItemId;

/// Ledger entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerEntryId(pub RecordId);

impl LedgerEntryId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LedgerEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Direction of a stock movement; the sign of the movement is encoded here,
/// the quantity itself stays positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }

    /// Turn a positive quantity into the signed stock effect of this direction.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementDirection::In => quantity,
            MovementDirection::Out => -quantity,
        }
    }
}

/// One immutable audit record of a stock movement.
///
/// Entries are never updated or deleted; corrections are new entries in the
/// opposite direction. Per item, the signed sum of all entries reconciles to
/// the current quantity on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedgerEntry {
    pub id: LedgerEntryId,
    pub item_id: InventoryItemId,
    pub direction: MovementDirection,
    /// Positive quantity; the direction encodes the sign.
    pub quantity: i64,
    pub reason: String,
    pub actor_id: ActorId,
    pub recorded_at: DateTime<Utc>,
}

impl StockLedgerEntry {
    pub fn record(
        item_id: InventoryItemId,
        direction: MovementDirection,
        quantity: i64,
        reason: impl Into<String>,
        actor_id: ActorId,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("ledger quantity must be positive"));
        }
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DomainError::validation("ledger reason cannot be empty"));
        }

        Ok(Self {
            id: LedgerEntryId::new(RecordId::new()),
            item_id,
            direction,
            quantity,
            reason,
            actor_id,
            recorded_at,
        })
    }

    /// The signed stock effect of this entry.
    pub fn signed_quantity(&self) -> i64 {
        self.direction.signed(self.quantity)
    }
}

/// Net signed movement over a set of entries (IN minus OUT).
///
/// For entries belonging to a single item this is the quantity the ledger
/// says should be on hand, relative to where the item started.
pub fn net_movement<'a>(entries: impl IntoIterator<Item = &'a StockLedgerEntry>) -> i64 {
    entries.into_iter().map(|e| e.signed_quantity()).sum()
}
