//! # Calculation Engine
//!
//! One call per "Calculate" press: normalize the raw fields, run the
//! calculator, cost the priced quantities, and build the detail record.
//! Nothing here touches the outside world; persisting the result is the
//! caller's business (see [`crate::history`]).
//!
//! ## Example
//!
//! ```rust
//! use tally_core::{CalculationInput, Engine, EngineSettings, PriceList};
//!
//! let engine = Engine::new(EngineSettings::default());
//! let raw = CalculationInput::new()
//!     .with("wall_length", "4")
//!     .with("wall_height", "3")
//!     .with("wall_thickness", "0.2");
//! let prices: PriceList = [("brick_price".to_string(), 55.0)].into_iter().collect();
//!
//! let output = engine.compute("aac-block", &raw, &prices)?;
//! let volume = output.quantity("wall_volume").unwrap_or_default();
//! assert!((volume - 2.4).abs() < 1e-9);
//! assert_eq!(output.total_cost(), 0.0); // no block size entered, so no blocks
//! # Ok::<(), tally_core::CalcError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{aggregate, AggregatedResult};
use crate::config::EngineSettings;
use crate::cost::{compose_costs, CostLineItem, PriceList};
use crate::detail::{build_detail, DetailRecord};
use crate::errors::CalcResult;
use crate::formulas::{registry, FormulaResult};
use crate::input::{normalize, CalculationInput, NormalizedInput};
use crate::session::CalculationSession;

/// Everything one calculation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub calculator_id: String,
    /// Raw fields as entered
    pub raw: CalculationInput,
    /// Unit prices as entered
    pub prices: PriceList,
    /// Canonical values the formulas saw
    pub input: NormalizedInput,
    pub quantities: Vec<FormulaResult>,
    pub costs: Vec<CostLineItem>,
    pub detail: DetailRecord,
    /// Default display precision in force for this calculation
    pub precision: u8,
}

impl CalculationOutput {
    /// Full-precision value of a quantity
    pub fn quantity(&self, key: &str) -> Option<f64> {
        self.quantities.iter().find(|q| q.key == key).map(|q| q.value)
    }

    /// Sum of all component costs
    pub fn total_cost(&self) -> f64 {
        self.costs.iter().find(|c| c.is_total()).map(|c| c.total_cost).unwrap_or(0.0)
    }

    /// The `material_quantity` / `work_cost_breakdown` maps
    pub fn aggregate(&self) -> AggregatedResult {
        aggregate(&self.quantities, &self.costs, self.precision)
    }

    /// Freeze into a session snapshot with a fresh id.
    pub fn into_session(self, created: DateTime<Utc>) -> CalculationSession {
        CalculationSession::freeze(self, created)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Engine { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run one calculator end to end.
    ///
    /// Only an unknown `calculator_id` fails; any field or price content is
    /// accepted.
    pub fn compute(
        &self,
        calculator_id: &str,
        raw: &CalculationInput,
        prices: &PriceList,
    ) -> CalcResult<CalculationOutput> {
        let def = registry::lookup(calculator_id).map_err(|e| {
            warn!(calculator = calculator_id, "unknown calculator requested");
            e
        })?;

        let input = normalize(raw, &def.inputs);
        let quantities = def.run(&input);
        let costs = compose_costs(&quantities, prices, &self.settings.currency);

        let unpriced: Vec<&str> = def
            .prices
            .iter()
            .filter(|p| !prices.contains_key(p.key))
            .map(|p| p.key)
            .collect();
        if !unpriced.is_empty() {
            debug!(calculator = calculator_id, missing = ?unpriced, "costing without some unit prices");
        }

        let detail = build_detail(raw, &def.inputs, &def.prices, prices, &quantities, &costs, &self.settings);

        debug!(
            calculator = calculator_id,
            quantities = quantities.len(),
            cost_lines = costs.len(),
            "calculation complete"
        );

        Ok(CalculationOutput {
            calculator_id: def.id.to_string(),
            raw: raw.clone(),
            prices: prices.clone(),
            input,
            quantities,
            costs,
            detail,
            precision: self.settings.precision,
        })
    }
}

/// Run a calculator with default settings.
pub fn compute(calculator_id: &str, raw: &CalculationInput, prices: &PriceList) -> CalcResult<CalculationOutput> {
    Engine::default().compute(calculator_id, raw, prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick_wall() -> CalculationInput {
        CalculationInput::new()
            .with("brick_length", "190")
            .with("brick_width", "90")
            .with("brick_height", "90")
            .with("mortar_thickness", "10")
            .with("wall_length", "5")
            .with("wall_height", "3")
            .with("wall_thickness", "0.2")
            .with("cement_ratio", "1")
            .with("sand_ratio", "6")
    }

    #[test]
    fn test_compute_is_deterministic() {
        let prices: PriceList = [("brick_price".to_string(), 8.0), ("cement_price".to_string(), 420.0)]
            .into_iter()
            .collect();
        let a = compute("brick-wall", &brick_wall(), &prices).unwrap();
        let b = compute("brick-wall", &brick_wall(), &prices).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_settings_flow_into_costs() {
        let engine = Engine::new(EngineSettings {
            precision: 2,
            currency: "USD".to_string(),
        });
        let output = engine.compute("brick-wall", &brick_wall(), &PriceList::new()).unwrap();
        assert!(output.costs.iter().all(|c| c.currency == "USD"));
        let agg = output.aggregate();
        assert!(agg.work_cost_breakdown.contains_key("total_cost_inr"));
        assert!(!agg.work_cost_breakdown.contains_key("total_cost_usd"));
    }

    #[test]
    fn test_unknown_calculator() {
        let err = compute("brick-arch", &CalculationInput::new(), &PriceList::new()).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CALCULATOR_TYPE");
    }

    #[test]
    fn test_empty_input_yields_zero_costs() {
        let output = compute("steel-beam", &CalculationInput::new(), &PriceList::new()).unwrap();
        assert_eq!(output.total_cost(), 0.0);
        assert!(output.quantities.iter().all(|q| q.value == 0.0));
    }
}
