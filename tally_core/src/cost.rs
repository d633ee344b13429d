//! # Cost Composition
//!
//! Multiplies priced quantities by user-entered unit prices.
//!
//! A quantity is priced when its [`FormulaResult`] carries a
//! [`PriceBinding`](crate::formulas::PriceBinding). Each such result yields
//! one component line in result order; a final `total_cost` line sums them.
//! A price that was never entered costs 0; the quantity itself is still
//! reported by the formula step.
//!
//! ```rust
//! use tally_core::cost::{compose_costs, CostKind, PriceList};
//! use tally_core::formulas::FormulaResult;
//! use tally_core::units::Unit;
//!
//! let results = vec![
//!     FormulaResult::new("no_of_bricks", 100.0, Unit::Count, "V / Vb").priced("brick_price", "brick_cost"),
//! ];
//! let prices: PriceList = [("brick_price".to_string(), 8.0)].into_iter().collect();
//!
//! let costs = compose_costs(&results, &prices, "INR");
//! assert_eq!(costs[0].total_cost, 800.0);
//! assert_eq!(costs[1].kind, CostKind::Total);
//! assert_eq!(costs[1].total_cost, 800.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::formulas::{finite_or_zero, FormulaResult};
use crate::units::Unit;

/// Unit prices keyed by price field (`brick_price` -> 8.0).
pub type PriceList = BTreeMap<String, f64>;

/// Label of the summary line
pub const TOTAL_COST_LABEL: &str = "total_cost";

/// A unit price a calculator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceField {
    /// Key in the [`PriceList`]
    pub key: &'static str,
    /// Translation key for the field label
    pub label_key: &'static str,
    /// Unit the price is quoted per
    pub per: Unit,
}

impl PriceField {
    pub const fn new(key: &'static str, label_key: &'static str, per: Unit) -> Self {
        Self { key, label_key, per }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    Component,
    Total,
}

/// One itemized cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    /// `brick_cost`, `cement_cost`, ... or `total_cost`
    pub label: String,
    /// Priced quantity; 0 on the total line
    pub quantity: f64,
    /// Price per unit of `quantity`; 0 on the total line or when not entered
    pub unit_price: f64,
    pub total_cost: f64,
    pub currency: String,
    pub kind: CostKind,
    /// Expression with concrete names (`no_of_bricks × brick_price`)
    pub formula: String,
}

impl CostLineItem {
    pub fn is_total(&self) -> bool {
        self.kind == CostKind::Total
    }
}

/// Cost every priced result, then append the total line.
pub fn compose_costs(results: &[FormulaResult], prices: &PriceList, currency: &str) -> Vec<CostLineItem> {
    let mut lines: Vec<CostLineItem> = results
        .iter()
        .filter_map(|result| {
            let binding = result.price.as_ref()?;
            let unit_price = prices.get(&binding.price_key).copied().map(finite_or_zero).unwrap_or(0.0);
            Some(CostLineItem {
                label: binding.cost_label.clone(),
                quantity: result.value,
                unit_price,
                total_cost: finite_or_zero(result.value * unit_price),
                currency: currency.to_string(),
                kind: CostKind::Component,
                formula: format!("{} × {}", result.key, binding.price_key),
            })
        })
        .collect();

    let total = finite_or_zero(lines.iter().map(|line| line.total_cost).sum());
    lines.push(CostLineItem {
        label: TOTAL_COST_LABEL.to_string(),
        quantity: 0.0,
        unit_price: 0.0,
        total_cost: total,
        currency: currency.to_string(),
        kind: CostKind::Total,
        formula: "Σ component costs".to_string(),
    });
    lines
}
