use serde::{Deserialize, Serialize};

use crate::reception::ReceivingLineItem;

/// Tri-state reception status.
///
/// Precedence when derived from line quantities: `Different` > `Partial` >
/// `Complete`. An over-delivery anywhere marks the whole event `Different`,
/// even if other lines are short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceptionStatus {
    Complete,
    Partial,
    Different,
}

impl ReceptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::Complete => "complete",
            ReceptionStatus::Partial => "partial",
            ReceptionStatus::Different => "different",
        }
    }
}

/// Derive the overall status of a reception from requested-vs-received
/// quantities.
///
/// - every line received exactly as requested → `Complete`
/// - any line over-delivered → `Different` (overrides shortfalls elsewhere)
/// - otherwise (at least one line short, none over) → `Partial`
///
/// An empty line set classifies as `Complete` (vacuously exact).
pub fn classify(lines: &[ReceivingLineItem]) -> ReceptionStatus {
    if lines.iter().any(|l| l.received > l.requested) {
        return ReceptionStatus::Different;
    }
    if lines.iter().any(|l| l.received < l.requested) {
        return ReceptionStatus::Partial;
    }
    ReceptionStatus::Complete
}

/// The portion of a received quantity actually reflected in stock.
///
/// Zero unless the event is `Complete`; partial and discrepant receptions
/// apply nothing until an edit resolves them.
pub fn applied_quantity(status: ReceptionStatus, received: i64) -> i64 {
    match status {
        ReceptionStatus::Complete => received,
        ReceptionStatus::Partial | ReceptionStatus::Different => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(requested: i64, received: i64) -> ReceivingLineItem {
        ReceivingLineItem {
            item_name: "toner cartridge".to_string(),
            requested,
            received,
            unit: "pcs".to_string(),
            item_id: None,
        }
    }

    #[test]
    fn exact_delivery_is_complete() {
        assert_eq!(classify(&[line(5, 5)]), ReceptionStatus::Complete);
    }

    #[test]
    fn shortfall_is_partial() {
        assert_eq!(classify(&[line(5, 3)]), ReceptionStatus::Partial);
    }

    #[test]
    fn excess_overrides_complete_lines() {
        assert_eq!(
            classify(&[line(5, 7), line(3, 3)]),
            ReceptionStatus::Different
        );
    }

    #[test]
    fn excess_overrides_shortfall() {
        assert_eq!(
            classify(&[line(5, 2), line(3, 4)]),
            ReceptionStatus::Different
        );
    }

    #[test]
    fn empty_line_set_is_complete() {
        assert_eq!(classify(&[]), ReceptionStatus::Complete);
    }

    #[test]
    fn applied_quantity_is_gated_on_complete() {
        assert_eq!(applied_quantity(ReceptionStatus::Complete, 10), 10);
        assert_eq!(applied_quantity(ReceptionStatus::Partial, 10), 0);
        assert_eq!(applied_quantity(ReceptionStatus::Different, 10), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: classification is independent of line order.
        #[test]
        fn classify_is_order_insensitive(
            pairs in prop::collection::vec((0i64..50, 0i64..50), 1..8),
            rotation in 0usize..8
        ) {
            let lines: Vec<_> = pairs.iter().map(|(req, rec)| line(*req, *rec)).collect();
            let mut rotated = lines.clone();
            rotated.rotate_left(rotation % lines.len());
            prop_assert_eq!(classify(&lines), classify(&rotated));
        }

        /// Property: `Complete` is returned iff every line matches exactly.
        #[test]
        fn complete_iff_all_lines_exact(
            pairs in prop::collection::vec((0i64..50, 0i64..50), 1..8)
        ) {
            let lines: Vec<_> = pairs.iter().map(|(req, rec)| line(*req, *rec)).collect();
            let all_exact = pairs.iter().all(|(req, rec)| req == rec);
            prop_assert_eq!(classify(&lines) == ReceptionStatus::Complete, all_exact);
        }

        /// Property: any over-delivered line forces `Different`.
        #[test]
        fn any_excess_forces_different(
            pairs in prop::collection::vec((0i64..50, 0i64..50), 0..7),
            excess_req in 0i64..50,
            excess_by in 1i64..10
        ) {
            let mut lines: Vec<_> = pairs.iter().map(|(req, rec)| line(*req, *rec)).collect();
            lines.push(line(excess_req, excess_req + excess_by));
            prop_assert_eq!(classify(&lines), ReceptionStatus::Different);
        }
    }
}
