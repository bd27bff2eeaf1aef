use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{ActorId, DomainError, DomainResult, RecordId};

/// Requisition identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequisitionId(pub RecordId);

impl RequisitionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RequisitionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Requisition status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Received,
}

/// A purchase request that a reception may fulfil.
///
/// The engine owns none of this entity's other fields; it only moves the
/// status `Approved → Received` when a full reception is recorded against it
/// and back again when that reception is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requisition {
    id: RequisitionId,
    status: RequisitionStatus,
    requested_by: ActorId,
    requested_at: DateTime<Utc>,
}

impl Requisition {
    pub fn new(
        id: RequisitionId,
        status: RequisitionStatus,
        requested_by: ActorId,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status,
            requested_by,
            requested_at,
        }
    }

    pub fn id(&self) -> RequisitionId {
        self.id
    }

    pub fn status(&self) -> RequisitionStatus {
        self.status
    }

    pub fn requested_by(&self) -> ActorId {
        self.requested_by
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Advance `Approved → Received` when a full reception lands.
    pub fn mark_received(&mut self) -> DomainResult<()> {
        if self.status != RequisitionStatus::Approved {
            return Err(DomainError::invariant(
                "only approved requisitions can be marked received",
            ));
        }
        self.status = RequisitionStatus::Received;
        Ok(())
    }

    /// Revert `Received → Approved` when the fulfilling reception goes away.
    pub fn revert_received(&mut self) -> DomainResult<()> {
        if self.status != RequisitionStatus::Received {
            return Err(DomainError::invariant(
                "only received requisitions can be reverted to approved",
            ));
        }
        self.status = RequisitionStatus::Approved;
        Ok(())
    }
}
