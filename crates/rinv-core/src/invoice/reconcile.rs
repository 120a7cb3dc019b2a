//! Quantity correction against a detected subtotal.
//!
//! When items add up to less than the printed subtotal, the shortfall is
//! assumed to be a misread quantity. Items are visited in receipt order and
//! the first ones whose unit price divides the remaining shortfall absorb it.
//! The pass is greedy: it does not search for the best assignment and can
//! over-correct when several items share a divisible price.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::invoice::{LineItem, checked_total};

/// Largest quantity a single correction may add, exclusive.
const MAX_MISSING_QTY: i64 = 50;

/// One quantity change made during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityCorrection {
    pub name: String,
    pub from_qty: i64,
    pub to_qty: i64,
    /// Shortfall against the subtotal before this change.
    pub diff: i64,
}

/// Raise item quantities toward `subtotal`.
pub fn reconcile_quantities(items: &mut [LineItem], subtotal: i64) -> Vec<QuantityCorrection> {
    let mut corrections = Vec::new();

    let Some(current) = checked_total(items) else {
        return corrections;
    };
    if current >= subtotal {
        return corrections;
    }

    let Some(mut diff) = subtotal.checked_sub(current) else {
        return corrections;
    };

    for item in items.iter_mut() {
        if item.unit <= 0 || diff % item.unit != 0 {
            continue;
        }

        let missing = diff / item.unit;
        if missing <= 0 || missing >= MAX_MISSING_QTY {
            continue;
        }

        let from_qty = item.qty;
        item.set_qty(item.qty + missing);

        info!(
            "Auto-correcting {} qty from {} to {} based on subtotal diff {}",
            item.name, from_qty, item.qty, diff
        );
        corrections.push(QuantityCorrection {
            name: item.name.clone(),
            from_qty,
            to_qty: item.qty,
            diff,
        });

        diff -= missing * item.unit;
        if diff == 0 {
            break;
        }
    }

    corrections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shortfall_absorbed_by_first_divisible_item() {
        let mut items = vec![LineItem::new("Switch", 1000, 5)];
        let corrections = reconcile_quantities(&mut items, 10000);

        assert_eq!(items[0], LineItem::new("Switch", 1000, 10));
        assert_eq!(
            corrections,
            vec![QuantityCorrection {
                name: "Switch".to_string(),
                from_qty: 5,
                to_qty: 10,
                diff: 5000,
            }]
        );
    }

    #[test]
    fn test_skips_non_divisible_items() {
        let mut items = vec![LineItem::new("PS5", 66980, 1), LineItem::new("SIM", 3000, 1)];
        reconcile_quantities(&mut items, 66980 + 3000 * 4);

        assert_eq!(items[0].qty, 1);
        assert_eq!(items[1].qty, 4);
    }

    #[test]
    fn test_large_shortfall_is_left_alone() {
        let mut items = vec![LineItem::new("box", 100, 1)];
        let corrections = reconcile_quantities(&mut items, 100 + 100 * 50);

        assert!(corrections.is_empty());
        assert_eq!(items[0].qty, 1);
    }

    #[test]
    fn test_no_change_when_sum_reaches_subtotal() {
        let mut items = vec![LineItem::new("box", 5000, 2)];
        assert!(reconcile_quantities(&mut items, 10000).is_empty());
        assert!(reconcile_quantities(&mut items, 8000).is_empty());
        assert_eq!(items[0].qty, 2);
    }

    #[test]
    fn test_overflowing_items_are_left_alone() {
        let mut items = vec![
            LineItem::new("a", 5_000_000_000_000_000_000, 1),
            LineItem::new("b", 5_000_000_000_000_000_000, 1),
        ];
        assert!(reconcile_quantities(&mut items, i64::MAX).is_empty());

        // Shortfall itself does not fit in i64.
        let mut items = vec![LineItem::new("c", -5_000_000_000_000_000_000, 1)];
        assert!(reconcile_quantities(&mut items, 5_000_000_000_000_000_000).is_empty());
        assert_eq!(items[0].qty, 1);
    }

    #[test]
    fn test_greedy_first_item_takes_everything() {
        // Both items divide the shortfall; the first one absorbs it all.
        let mut items = vec![LineItem::new("a", 1000, 1), LineItem::new("b", 2000, 1)];
        let corrections = reconcile_quantities(&mut items, 3000 + 4000);

        assert_eq!(corrections.len(), 1);
        assert_eq!(items[0].qty, 5);
        assert_eq!(items[1].qty, 1);
    }

    #[test]
    fn test_later_item_absorbs_when_earlier_does_not_divide() {
        // 7000 short: 2000 does not divide it, 7000 does.
        let mut items = vec![LineItem::new("a", 2000, 1), LineItem::new("b", 7000, 1)];
        let corrections = reconcile_quantities(&mut items, 9000 + 7000);

        assert_eq!(corrections.len(), 1);
        assert_eq!(items[0].qty, 1);
        assert_eq!(items[1].qty, 2);
    }
}
