use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{ActorId, DomainError, DomainResult, RecordId};
use depot_inventory::InventoryItemId;
use depot_requisitions::RequisitionId;

use crate::status::ReceptionStatus;

/// Reception identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceptionId(pub RecordId);

impl ReceptionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReceptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One received line: what was asked for, what arrived.
///
/// `item_id` links the line to a stocked inventory item; lines without a
/// link (ad hoc goods) are recorded but never touch stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivingLineItem {
    pub item_name: String,
    pub requested: i64,
    pub received: i64,
    pub unit: String,
    pub item_id: Option<InventoryItemId>,
}

impl ReceivingLineItem {
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation("line item name cannot be empty"));
        }
        if self.requested < 0 {
            return Err(DomainError::validation(
                "requested quantity cannot be negative",
            ));
        }
        if self.received < 0 {
            return Err(DomainError::validation(
                "received quantity cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Validate a line set: each line well-formed, at most one line per linked
/// inventory item (edits diff old vs. new lines by that link).
fn validate_lines(lines: &[ReceivingLineItem]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("reception must have lines"));
    }
    for line in lines {
        line.validate()?;
    }
    for (i, line) in lines.iter().enumerate() {
        if let Some(item_id) = line.item_id {
            if lines[i + 1..].iter().any(|l| l.item_id == Some(item_id)) {
                return Err(DomainError::validation(format!(
                    "duplicate line for inventory item {item_id}"
                )));
            }
        }
    }
    Ok(())
}

/// A goods-received event, possibly against a requisition.
///
/// The single-item legacy shape is normalized away at the boundary (see
/// [`NewReception::single`]); internally an event always carries a line list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivingEvent {
    id: ReceptionId,
    requisition_id: Option<RequisitionId>,
    status: ReceptionStatus,
    lines: Vec<ReceivingLineItem>,
    received_by: ActorId,
    received_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReceivingEvent {
    pub fn new(
        id: ReceptionId,
        requisition_id: Option<RequisitionId>,
        status: ReceptionStatus,
        lines: Vec<ReceivingLineItem>,
        received_by: ActorId,
        received_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        validate_lines(&lines)?;
        Ok(Self {
            id,
            requisition_id,
            status,
            lines,
            received_by,
            received_at,
            updated_at: received_at,
        })
    }

    pub fn id(&self) -> ReceptionId {
        self.id
    }

    pub fn requisition_id(&self) -> Option<RequisitionId> {
        self.requisition_id
    }

    pub fn status(&self) -> ReceptionStatus {
        self.status
    }

    pub fn lines(&self) -> &[ReceivingLineItem] {
        &self.lines
    }

    pub fn received_by(&self) -> ActorId {
        self.received_by
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace status and lines after an edit has been reconciled.
    pub fn replace(
        &mut self,
        status: ReceptionStatus,
        lines: Vec<ReceivingLineItem>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        validate_lines(&lines)?;
        self.status = status;
        self.lines = lines;
        self.updated_at = updated_at;
        Ok(())
    }
}

/// Input for creating a reception.
///
/// `status: None` asks the engine to derive the status from the line
/// quantities (the classifier runs before any stock is touched).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReception {
    pub requisition_id: Option<RequisitionId>,
    pub status: Option<ReceptionStatus>,
    pub lines: Vec<ReceivingLineItem>,
}

impl NewReception {
    pub fn new(lines: Vec<ReceivingLineItem>) -> Self {
        Self {
            requisition_id: None,
            status: None,
            lines,
        }
    }

    /// Legacy single-item shape: one event, no explicit lines. Normalized to
    /// a one-element line list so reconciliation has a single code path.
    pub fn single(
        item_name: impl Into<String>,
        requested: i64,
        received: i64,
        unit: impl Into<String>,
        item_id: Option<InventoryItemId>,
    ) -> Self {
        Self::new(vec![ReceivingLineItem {
            item_name: item_name.into(),
            requested,
            received,
            unit: unit.into(),
            item_id,
        }])
    }

    pub fn with_status(mut self, status: ReceptionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn against_requisition(mut self, requisition_id: RequisitionId) -> Self {
        self.requisition_id = Some(requisition_id);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_lines(&self.lines)
    }
}

/// Input for editing a reception. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReceptionUpdate {
    pub status: Option<ReceptionStatus>,
    pub lines: Option<Vec<ReceivingLineItem>>,
}

impl ReceptionUpdate {
    pub fn status_only(status: ReceptionStatus) -> Self {
        Self {
            status: Some(status),
            lines: None,
        }
    }

    pub fn lines_only(lines: Vec<ReceivingLineItem>) -> Self {
        Self {
            status: None,
            lines: Some(lines),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(lines) = &self.lines {
            validate_lines(lines)?;
        }
        Ok(())
    }
}
