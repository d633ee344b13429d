//! # Detail Records
//!
//! The audit view of one calculation: what went in, and how each output
//! line was obtained.
//!
//! Input rows echo what the user typed (in the unit they typed it), not the
//! normalized value, followed by one row per unit price. Output rows pair
//! every quantity and cost line with the formula that produced it.

use serde::{Deserialize, Serialize};

use crate::config::EngineSettings;
use crate::cost::{CostLineItem, PriceField, PriceList};
use crate::formulas::{finite_or_zero, FormulaResult};
use crate::input::{CalculationInput, FieldSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    pub label_key: String,
    pub symbol: String,
    /// Entered value with its unit (`230 mm`)
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub title_key: String,
    pub formula: String,
    /// Value at display precision with its unit (`1.300 m³`)
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub inputs: Vec<InputRow>,
    pub outputs: Vec<OutputRow>,
}

/// Assemble the detail record of one calculation.
pub fn build_detail(
    raw: &CalculationInput,
    schema: &[FieldSchema],
    price_fields: &[PriceField],
    prices: &PriceList,
    results: &[FormulaResult],
    costs: &[CostLineItem],
    settings: &EngineSettings,
) -> DetailRecord {
    let mut inputs: Vec<InputRow> = schema
        .iter()
        .map(|field| InputRow {
            label_key: field.label_key.to_string(),
            symbol: field.symbol.to_string(),
            value: format!("{} {}", entered_text(raw.get(field.name)), field.unit),
        })
        .collect();

    inputs.extend(price_fields.iter().map(|price| {
        let amount = prices.get(price.key).copied().map(finite_or_zero).unwrap_or(0.0);
        InputRow {
            label_key: price.label_key.to_string(),
            symbol: price.key.to_string(),
            value: format!("{} {}/{}", amount, settings.currency, price.per),
        }
    }));

    let mut outputs: Vec<OutputRow> = results
        .iter()
        .map(|result| OutputRow {
            title_key: result.key.clone(),
            formula: result.formula.clone(),
            value: format!(
                "{} {}",
                format_value(result.value, result.display_precision(settings.precision)),
                result.unit
            ),
        })
        .collect();

    outputs.extend(costs.iter().map(|cost| OutputRow {
        title_key: cost.label.clone(),
        formula: cost.formula.clone(),
        value: format!("{} {}", format_value(cost.total_cost, settings.precision), cost.currency),
    }));

    DetailRecord { inputs, outputs }
}

/// The raw text when it reads as a number, else `0`.
fn entered_text(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() && text.parse::<f64>().map(f64::is_finite).unwrap_or(false) => {
            text.to_string()
        }
        _ => "0".to_string(),
    }
}

/// Round half away from zero to `decimals` places.
///
/// ```rust
/// use tally_core::detail::round_to;
///
/// assert_eq!(round_to(99.826_2, 0), 100.0);
/// assert_eq!(round_to(0.940_408, 3), 0.94);
/// ```
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        finite_or_zero(value)
    }
}

/// Format with a fixed number of decimals; never prints `-0`.
pub fn format_value(value: f64, decimals: u8) -> String {
    let rounded = round_to(value, decimals);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.*}", usize::from(decimals), rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::compose_costs;
    use crate::units::Unit;

    fn schema() -> Vec<FieldSchema> {
        vec![
            FieldSchema::millimeters("brick_length", "brick_length", "L"),
            FieldSchema::meters("wall_length", "wall_length", "l"),
        ]
    }

    #[test]
    fn test_inputs_echo_entered_text() {
        let raw = CalculationInput::new().with("brick_length", " 190 ").with("wall_length", "ten");
        let detail = build_detail(&raw, &schema(), &[], &PriceList::new(), &[], &[], &EngineSettings::default());
        assert_eq!(detail.inputs[0].value, "190 mm");
        assert_eq!(detail.inputs[0].symbol, "L");
        assert_eq!(detail.inputs[1].value, "0 m");
    }

    #[test]
    fn test_price_rows_follow_fields() {
        let prices: PriceList = [("brick_price".to_string(), 8.5)].into_iter().collect();
        let fields = [PriceField::new("brick_price", "brick_price", Unit::Count)];
        let detail = build_detail(
            &CalculationInput::new(),
            &schema(),
            &fields,
            &prices,
            &[],
            &[],
            &EngineSettings::default(),
        );
        assert_eq!(detail.inputs.len(), 3);
        assert_eq!(detail.inputs[2].value, "8.5 INR/nos");
    }

    #[test]
    fn test_outputs_use_result_precision() {
        let results = vec![
            FormulaResult::new("wall_volume", 1.3, Unit::CubicMeter, "l × h × t"),
            FormulaResult::new("no_of_bricks", 99.83, Unit::Count, "V / Vb")
                .with_precision(0)
                .priced("brick_price", "brick_cost"),
        ];
        let prices: PriceList = [("brick_price".to_string(), 10.0)].into_iter().collect();
        let costs = compose_costs(&results, &prices, "INR");
        let detail = build_detail(
            &CalculationInput::new(),
            &[],
            &[],
            &prices,
            &results,
            &costs,
            &EngineSettings::default(),
        );

        assert_eq!(detail.outputs[0].value, "1.300 m³");
        assert_eq!(detail.outputs[1].value, "100 nos");
        assert_eq!(detail.outputs[2].title_key, "brick_cost");
        assert_eq!(detail.outputs[2].formula, "no_of_bricks × brick_price");
        assert_eq!(detail.outputs[2].value, "998.300 INR");
        assert_eq!(detail.outputs[3].formula, "Σ component costs");
    }

    #[test]
    fn test_format_value_no_negative_zero() {
        assert_eq!(format_value(-0.0001, 3), "0.000");
        assert_eq!(format_value(2.0 / 3.0, 3), "0.667");
    }
}
