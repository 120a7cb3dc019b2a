//! Margin deduction applied to extracted unit prices before invoicing.
//!
//! The rule is a pricing policy rather than part of extraction, so it is a
//! strategy the caller picks.

use tracing::debug;

use crate::models::config::MarginConfig;
use crate::models::invoice::LineItem;

/// Pricing policy mapping `(name, unit price)` to the invoiced unit price.
pub trait MarginPolicy {
    fn adjust(&self, name: &str, unit: i64) -> i64;
}

impl<F> MarginPolicy for F
where
    F: Fn(&str, i64) -> i64,
{
    fn adjust(&self, name: &str, unit: i64) -> i64 {
        self(name, unit)
    }
}

/// Leaves prices untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMargin;

impl MarginPolicy for NoMargin {
    fn adjust(&self, _name: &str, unit: i64) -> i64 {
        unit
    }
}

/// Two-tier fixed deduction: a larger one for expensive items or a given
/// brand, a smaller one for everything else.
#[derive(Debug, Clone)]
pub struct TieredMargin {
    threshold: i64,
    brand_keyword: String,
    large: i64,
    small: i64,
}

impl TieredMargin {
    pub fn new(threshold: i64, brand_keyword: impl Into<String>, large: i64, small: i64) -> Self {
        Self {
            threshold,
            brand_keyword: brand_keyword.into().to_lowercase(),
            large,
            small,
        }
    }

    pub fn from_config(config: &MarginConfig) -> Self {
        Self::new(
            config.threshold,
            config.brand_keyword.clone(),
            config.large_deduction,
            config.small_deduction,
        )
    }
}

impl Default for TieredMargin {
    fn default() -> Self {
        Self::from_config(&MarginConfig::default())
    }
}

impl MarginPolicy for TieredMargin {
    fn adjust(&self, name: &str, unit: i64) -> i64 {
        let branded =
            !self.brand_keyword.is_empty() && name.to_lowercase().contains(&self.brand_keyword);
        if branded || unit >= self.threshold {
            unit.saturating_sub(self.large)
        } else {
            unit.saturating_sub(self.small)
        }
    }
}

/// Policy selected by configuration.
pub fn policy_from_config(config: &MarginConfig) -> Box<dyn MarginPolicy> {
    if config.enabled {
        Box::new(TieredMargin::from_config(config))
    } else {
        Box::new(NoMargin)
    }
}

/// Apply a policy to every item, recomputing totals.
pub fn apply_margin<P: MarginPolicy + ?Sized>(items: &mut [LineItem], policy: &P) {
    for item in items.iter_mut() {
        let adjusted = policy.adjust(&item.name, item.unit);
        if adjusted != item.unit {
            debug!("Margin: {} unit {} -> {}", item.name, item.unit, adjusted);
        }
        item.set_unit(adjusted);
    }
}
