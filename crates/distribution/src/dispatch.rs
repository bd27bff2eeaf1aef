use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{ActorId, DomainError, DomainResult, RecordId};
use depot_inventory::InventoryItemId;

/// Distribution identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionId(pub RecordId);

impl DistributionId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DistributionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One issued line. Unlike receiving there is no requested-vs-received
/// split; the quantity leaves stock in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionLineItem {
    pub item_name: String,
    pub quantity: i64,
    pub unit: String,
    pub item_id: Option<InventoryItemId>,
}

impl DistributionLineItem {
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation("line item name cannot be empty"));
        }
        if self.quantity <= 0 {
            return Err(DomainError::validation(
                "distributed quantity must be positive",
            ));
        }
        Ok(())
    }
}

/// Validate a line set: each line well-formed, at most one line per linked
/// inventory item (edits diff old vs. new lines by that link).
fn validate_lines(lines: &[DistributionLineItem]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("distribution must have lines"));
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

/// A goods-issued event: stock handed to a recipient/department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEvent {
    id: DistributionId,
    recipient: String,
    department: String,
    lines: Vec<DistributionLineItem>,
    issued_by: ActorId,
    issued_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DistributionEvent {
    pub fn new(
        id: DistributionId,
        recipient: impl Into<String>,
        department: impl Into<String>,
        lines: Vec<DistributionLineItem>,
        issued_by: ActorId,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let recipient = recipient.into();
        if recipient.trim().is_empty() {
            return Err(DomainError::validation("recipient cannot be empty"));
        }
        validate_lines(&lines)?;
        Ok(Self {
            id,
            recipient,
            department: department.into(),
            lines,
            issued_by,
            issued_at,
            updated_at: issued_at,
        })
    }

    pub fn id(&self) -> DistributionId {
        self.id
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn lines(&self) -> &[DistributionLineItem] {
        &self.lines
    }

    pub fn issued_by(&self) -> ActorId {
        self.issued_by
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace metadata and lines after an edit has been reconciled.
    pub fn replace(
        &mut self,
        recipient: Option<String>,
        department: Option<String>,
        lines: Vec<DistributionLineItem>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        validate_lines(&lines)?;
        if let Some(recipient) = recipient {
            if recipient.trim().is_empty() {
                return Err(DomainError::validation("recipient cannot be empty"));
            }
            self.recipient = recipient;
        }
        if let Some(department) = department {
            self.department = department;
        }
        self.lines = lines;
        self.updated_at = updated_at;
        Ok(())
    }
}

/// Input for creating a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDistribution {
    pub recipient: String,
    pub department: String,
    pub lines: Vec<DistributionLineItem>,
}

impl NewDistribution {
    pub fn new(
        recipient: impl Into<String>,
        department: impl Into<String>,
        lines: Vec<DistributionLineItem>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            department: department.into(),
            lines,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.recipient.trim().is_empty() {
            return Err(DomainError::validation("recipient cannot be empty"));
        }
        validate_lines(&self.lines)
    }
}

/// Input for editing a distribution. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DistributionUpdate {
    pub recipient: Option<String>,
    pub department: Option<String>,
    pub lines: Option<Vec<DistributionLineItem>>,
}

impl DistributionUpdate {
    pub fn lines_only(lines: Vec<DistributionLineItem>) -> Self {
        Self {
            recipient: None,
            department: None,
            lines: Some(lines),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(recipient) = &self.recipient {
            if recipient.trim().is_empty() {
                return Err(DomainError::validation("recipient cannot be empty"));
            }
        }
        if let Some(lines) = &self.lines {
            validate_lines(lines)?;
        }
        Ok(())
    }
}
