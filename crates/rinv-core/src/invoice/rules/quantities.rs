//! Unit price, quantity and total decomposition of a price row.
//!
//! Three strategies are tried in order and the first valid result wins:
//!
//! 1. [`Tier::TwoNumbers`]: first and last comma-grouped numbers are unit
//!    price and total.
//! 2. [`Tier::SingleNumber`]: a lone comma-grouped number is a single unit.
//! 3. [`Tier::DigitRun`]: all digits of the row are concatenated and split
//!    into `qty | unit | total` by brute force, shortest total first, then
//!    shortest unit.
//!
//! The digit-run search order decides between several valid splits and must
//! stay as it is.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::invoice::MAX_AMOUNT;

use super::patterns::{GROUPED_NUMBER, NON_DIGIT};

/// Lower bound on the unit price accepted by the two-number strategy.
const MIN_GROUPED_UNIT: i64 = 1000;

/// Quantities are expected to stay below this.
const MAX_QTY: i64 = 100;

/// Length range (in digits) tried for total and unit in the digit-run tier.
const RUN_LENGTHS: std::ops::RangeInclusive<usize> = 3..=7;

/// Strategy that produced a decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    TwoNumbers,
    SingleNumber,
    DigitRun,
}

/// Unit price, quantity and total read from one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantities {
    pub unit: i64,
    pub qty: i64,
    pub total: i64,
    pub tier: Tier,
}

/// Decompose a price row, trying each tier in order.
pub fn parse_quantities(price_text: &str) -> Option<Quantities> {
    let grouped: Vec<&str> = GROUPED_NUMBER
        .find_iter(price_text)
        .map(|m| m.as_str())
        .collect();

    two_numbers(&grouped)
        .or_else(|| single_number(&grouped))
        .or_else(|| digit_run(price_text))
}

fn parse_grouped(number: &str) -> Option<i64> {
    let value: i64 = number.replace(',', "").parse().ok()?;
    (value <= MAX_AMOUNT).then_some(value)
}

/// First grouped number is the unit price, last is the line total.
fn two_numbers(grouped: &[&str]) -> Option<Quantities> {
    if grouped.len() < 2 {
        return None;
    }

    let unit = parse_grouped(grouped[0])?;
    let total = parse_grouped(grouped[grouped.len() - 1])?;

    if unit > MIN_GROUPED_UNIT && total >= unit && total % unit == 0 && total / unit < MAX_QTY {
        trace!("Two-number tier: {} x {} = {}", unit, total / unit, total);
        Some(Quantities {
            unit,
            qty: total / unit,
            total,
            tier: Tier::TwoNumbers,
        })
    } else {
        None
    }
}

/// A lone grouped number: its first two groups form the unit price.
fn single_number(grouped: &[&str]) -> Option<Quantities> {
    if grouped.len() != 1 {
        return None;
    }

    let mut parts = grouped[0].split(',');
    let head = parts.next()?;
    let next = parts.next()?;
    let unit: i64 = format!("{}{}", head, next).parse().ok()?;

    trace!("Single-number tier: {}", unit);
    Some(Quantities {
        unit,
        qty: 1,
        total: unit,
        tier: Tier::SingleNumber,
    })
}

/// Brute-force split of the concatenated digits into `qty | unit | total`.
fn digit_run(price_text: &str) -> Option<Quantities> {
    let digits = NON_DIGIT.replace_all(price_text, "");
    let digits = digits.as_ref();
    let len = digits.len();

    for lt in RUN_LENGTHS {
        if lt > len {
            break;
        }
        let total: i64 = digits[len - lt..].parse().ok()?;
        if total == 0 {
            continue;
        }

        for lu in RUN_LENGTHS {
            if lt + lu > len {
                break;
            }
            let unit: i64 = digits[len - lt - lu..len - lt].parse().ok()?;
            if unit == 0 {
                continue;
            }

            let Some(qty) = leading_qty(&digits[..len - lt - lu]) else {
                // Remainder too large to be a quantity.
                continue;
            };

            if qty > 0 && qty < MAX_QTY && qty * unit == total {
                trace!("Digit-run tier: {} x {} = {} (explicit qty)", unit, qty, total);
                return Some(Quantities {
                    unit,
                    qty,
                    total,
                    tier: Tier::DigitRun,
                });
            }
            if qty == 0 && total % unit == 0 && total / unit < MAX_QTY {
                trace!("Digit-run tier: {} x {} = {} (implied qty)", unit, total / unit, total);
                return Some(Quantities {
                    unit,
                    qty: total / unit,
                    total,
                    tier: Tier::DigitRun,
                });
            }
        }
    }

    None
}

/// Quantity prefix of a digit run; empty or all-zero means "no quantity".
fn leading_qty(rest: &str) -> Option<i64> {
    let significant = rest.trim_start_matches('0');
    if significant.is_empty() {
        return Some(0);
    }
    significant.parse().ok()
}
