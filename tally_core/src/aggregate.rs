//! # Result Aggregation
//!
//! Flattens quantities and costs into the two maps that the summary view
//! shows and that history stores:
//!
//! ```json
//! {
//!   "calculation": {
//!     "material_quantity": { "no_of_bricks_nos": 100.0, "sand_volume": 0.211 },
//!     "work_cost_breakdown": { "brick_cost_inr": 998.0, "total_cost_inr": 1250.5 }
//!   },
//!   "ai_insights": { ... }
//! }
//! ```
//!
//! Keys are built so that [`derive_label`](crate::labels::derive_label)
//! turns them back into the quantity's title: a unit token is appended to
//! quantities whose unit has one, and [`COST_KEY_TOKEN`] to costs. The
//! stored shape does not change with the configured currency; the currency
//! itself travels on each [`CostLineItem`]. Values are rounded to the
//! precision they are displayed with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cost::CostLineItem;
use crate::detail::round_to;
use crate::formulas::FormulaResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Storage key -> quantity at display precision
    pub material_quantity: BTreeMap<String, f64>,
    /// Cost key -> amount
    pub work_cost_breakdown: BTreeMap<String, f64>,
}

/// Shape handed to history and the summary view.
///
/// `ai_insights` comes from an external service; it is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationPayload {
    pub calculation: AggregatedResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<serde_json::Value>,
}

impl CalculationPayload {
    pub fn new(calculation: AggregatedResult) -> Self {
        CalculationPayload {
            calculation,
            ai_insights: None,
        }
    }

    pub fn with_insights(mut self, insights: serde_json::Value) -> Self {
        self.ai_insights = Some(insights);
        self
    }
}

/// Key a quantity is stored under (`cement_bags` -> `cement_bags_nos`).
pub fn storage_key(result: &FormulaResult) -> String {
    match result.unit.storage_token() {
        Some(token) => format!("{}_{}", result.key, token),
        None => result.key.clone(),
    }
}

/// Token closing every `work_cost_breakdown` key.
pub const COST_KEY_TOKEN: &str = "inr";

/// Key a cost line is stored under (`brick_cost` -> `brick_cost_inr`).
pub fn cost_key(cost: &CostLineItem) -> String {
    format!("{}_{}", cost.label, COST_KEY_TOKEN)
}

pub fn aggregate(results: &[FormulaResult], costs: &[CostLineItem], precision: u8) -> AggregatedResult {
    let material_quantity = results
        .iter()
        .map(|r| (storage_key(r), round_to(r.value, r.display_precision(precision))))
        .collect();

    let work_cost_breakdown = costs
        .iter()
        .map(|c| (cost_key(c), round_to(c.total_cost, precision)))
        .collect();

    AggregatedResult {
        material_quantity,
        work_cost_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{compose_costs, PriceList};
    use crate::labels::derive_label;
    use crate::units::Unit;

    fn results() -> Vec<FormulaResult> {
        vec![
            FormulaResult::new("wall_volume", 1.3, Unit::CubicMeter, "l × h × t"),
            FormulaResult::new("no_of_bricks", 99.826, Unit::Count, "V / Vb")
                .with_precision(0)
                .priced("brick_price", "brick_cost"),
            FormulaResult::new("cement_bags", 2.68751, Unit::Bags, "c").priced("cement_price", "cement_cost"),
            FormulaResult::new("steel_weight", 106.6667, Unit::Kilogram, "w"),
        ]
    }

    #[test]
    fn test_keys_and_rounding() {
        let prices: PriceList = [("brick_price".to_string(), 10.0)].into_iter().collect();
        let costs = compose_costs(&results(), &prices, "INR");
        let agg = aggregate(&results(), &costs, 3);

        assert_eq!(agg.material_quantity["wall_volume"], 1.3);
        assert_eq!(agg.material_quantity["no_of_bricks_nos"], 100.0);
        assert_eq!(agg.material_quantity["cement_bags_nos"], 2.688);
        assert_eq!(agg.material_quantity["steel_weight_kg"], 106.667);
        assert_eq!(agg.work_cost_breakdown["brick_cost_inr"], 998.26);
        assert_eq!(agg.work_cost_breakdown["cement_cost_inr"], 0.0);
        assert_eq!(agg.work_cost_breakdown["total_cost_inr"], 998.26);
    }

    #[test]
    fn test_keys_round_trip_through_labels() {
        for result in results() {
            let mut expected = String::new();
            for word in result.key.split('_') {
                if !expected.is_empty() {
                    expected.push(' ');
                }
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    expected.extend(first.to_uppercase());
                    expected.push_str(chars.as_str());
                }
            }
            assert_eq!(derive_label(&storage_key(&result)), expected);
        }
        assert_eq!(derive_label("brick_cost_inr"), "Brick Cost");
    }

    #[test]
    fn test_cost_keys_ignore_currency() {
        let prices: PriceList = [("cement_price".to_string(), 400.0)].into_iter().collect();
        for currency in ["INR", "USD", "EUR"] {
            let costs = compose_costs(&results(), &prices, currency);
            let agg = aggregate(&results(), &costs, 3);
            let keys: Vec<&str> = agg.work_cost_breakdown.keys().map(String::as_str).collect();
            assert_eq!(keys, ["brick_cost_inr", "cement_cost_inr", "total_cost_inr"]);
            let labels: Vec<String> = keys.iter().map(|k| derive_label(k)).collect();
            assert_eq!(labels, ["Brick Cost", "Cement Cost", "Total Cost"]);
        }
    }

    #[test]
    fn test_payload_shape() {
        let agg = aggregate(&results(), &[], 3);
        let payload = CalculationPayload::new(agg);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["calculation"]["material_quantity"].is_object());
        assert!(json["calculation"]["work_cost_breakdown"].is_object());
        assert!(json.get("ai_insights").is_none());
    }

    #[test]
    fn test_insights_preserved() {
        let insights = serde_json::json!({"summary": "ok", "tips": [1, 2]});
        let payload = CalculationPayload::default().with_insights(insights.clone());
        let text = serde_json::to_string(&payload).unwrap();
        let back: CalculationPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(back.ai_insights, Some(insights));
    }
}
