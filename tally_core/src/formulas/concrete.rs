//! # Concrete Formulas
//!
//! Nominal-mix concrete for common members. Each calculator only knows how
//! to get the wet volume `V` of its shape; the mix step is shared:
//!
//! ```text
//! Vd           = V × 1.54                      (dry volume)
//! cement bags  = c × Vd / ((c + s + a) × 0.035)
//! sand         = s × Vd / (c + s + a)
//! aggregate    = a × Vd / (c + s + a)
//! ```
//!
//! `c:s:a` is the cement : sand : coarse aggregate ratio (e.g. 1:2:4 for M15).

use std::f64::consts::PI;

use crate::cost::PriceField;
use crate::input::{FieldSchema, NormalizedInput};
use crate::units::Unit;

use super::{
    non_negative, safe_div, CalculatorDefinition, CalculatorFamily, Constant, FormulaResult,
    CEMENT_BAG_VOLUME_M3,
};

/// Dry-volume factor for concrete (voids in the dry ingredients)
pub const CONCRETE_DRY_FACTOR: f64 = 1.54;

// =============================================================================
// Mix Step
// =============================================================================

/// Append the dry-volume and material lines for wet volume `volume`.
fn nominal_mix(input: &NormalizedInput, volume: f64, results: &mut Vec<FormulaResult>) {
    let c = input.get("cement_ratio");
    let s = input.get("sand_ratio");
    let a = input.get("aggregate_ratio");
    let parts = c + s + a;
    let dry = volume * CONCRETE_DRY_FACTOR;

    results.push(FormulaResult::new("dry_volume", dry, Unit::CubicMeter, "V × 1.54"));
    results.push(
        FormulaResult::new(
            "cement_bags",
            safe_div(c * dry, parts * CEMENT_BAG_VOLUME_M3),
            Unit::Bags,
            "c × Vd / ((c + s + a) × 0.035)",
        )
        .priced("cement_price", "cement_cost"),
    );
    results.push(
        FormulaResult::new("sand_volume", safe_div(s * dry, parts), Unit::CubicMeter, "s × Vd / (c + s + a)")
            .priced("sand_price", "sand_cost"),
    );
    results.push(
        FormulaResult::new(
            "aggregate_volume",
            safe_div(a * dry, parts),
            Unit::CubicMeter,
            "a × Vd / (c + s + a)",
        )
        .priced("aggregate_price", "aggregate_cost"),
    );
}

fn with_mix(input: &NormalizedInput, mut results: Vec<FormulaResult>) -> Vec<FormulaResult> {
    // The member volume is always the last geometry line.
    let volume = results.last().map(|r| r.value).unwrap_or(0.0);
    nominal_mix(input, volume, &mut results);
    results
}

// =============================================================================
// Member Volumes
// =============================================================================

fn compute_column(input: &NormalizedInput) -> Vec<FormulaResult> {
    let v = input.get("column_length")
        * input.get("column_width")
        * input.get("column_height")
        * input.get("column_count");
    with_mix(input, vec![FormulaResult::new("concrete_volume", v, Unit::CubicMeter, "L × W × H × n")])
}

fn compute_footing(input: &NormalizedInput) -> Vec<FormulaResult> {
    let v = input.get("footing_length")
        * input.get("footing_width")
        * input.get("footing_depth")
        * input.get("footing_count");
    with_mix(input, vec![FormulaResult::new("concrete_volume", v, Unit::CubicMeter, "L × W × D × n")])
}

fn compute_wall(input: &NormalizedInput) -> Vec<FormulaResult> {
    let v = input.get("wall_length") * input.get("wall_height") * input.get("wall_thickness");
    with_mix(input, vec![FormulaResult::new("concrete_volume", v, Unit::CubicMeter, "l × h × t")])
}

fn compute_tube(input: &NormalizedInput) -> Vec<FormulaResult> {
    let outer = input.get("outer_diameter");
    let inner = input.get("inner_diameter");
    let v = non_negative(
        PI / 4.0 * (outer * outer - inner * inner) * input.get("tube_height") * input.get("tube_count"),
    );
    with_mix(
        input,
        vec![FormulaResult::new("concrete_volume", v, Unit::CubicMeter, "π / 4 × (D² − d²) × h × n")],
    )
}

fn compute_staircase(input: &NormalizedInput) -> Vec<FormulaResult> {
    let riser = input.get("riser");
    let tread = input.get("tread");
    let steps = input.get("steps");
    let width = input.get("stair_width");

    let step_volume = steps * riser * tread / 2.0 * width;
    let waist_volume = steps * (riser * riser + tread * tread).sqrt() * input.get("waist_thickness") * width;

    with_mix(
        input,
        vec![
            FormulaResult::new("step_volume", step_volume, Unit::CubicMeter, "N × R × G / 2 × B"),
            FormulaResult::new("waist_volume", waist_volume, Unit::CubicMeter, "N × √(R² + G²) × w × B"),
            FormulaResult::new(
                "concrete_volume",
                step_volume + waist_volume,
                Unit::CubicMeter,
                "Vs + Vw",
            ),
        ],
    )
}

fn compute_gutter(input: &NormalizedInput) -> Vec<FormulaResult> {
    let section = input.get("outer_width") * input.get("outer_height")
        - input.get("inner_width") * input.get("inner_height");
    let v = non_negative(input.get("gutter_length") * section);
    with_mix(
        input,
        vec![FormulaResult::new("concrete_volume", v, Unit::CubicMeter, "l × (Wo × Ho − Wi × Hi)")],
    )
}

// =============================================================================
// Definitions
// =============================================================================

fn mix_fields() -> [FieldSchema; 3] {
    [
        FieldSchema::ratio("cement_ratio", "cement_ratio", "c"),
        FieldSchema::ratio("sand_ratio", "sand_ratio", "s"),
        FieldSchema::ratio("aggregate_ratio", "aggregate_ratio", "a"),
    ]
}

fn mix_prices() -> Vec<PriceField> {
    vec![
        PriceField::new("cement_price", "cement_price", Unit::Bags),
        PriceField::new("sand_price", "sand_price", Unit::CubicMeter),
        PriceField::new("aggregate_price", "aggregate_price", Unit::CubicMeter),
    ]
}

fn mix_constants() -> Vec<Constant> {
    vec![
        Constant::new("Dry-volume factor", CONCRETE_DRY_FACTOR, ""),
        Constant::new("Cement bag volume", CEMENT_BAG_VOLUME_M3, "m³"),
    ]
}

fn member(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    geometry: Vec<FieldSchema>,
    shape_constants: &[Constant],
    compute: super::ComputeFn,
) -> CalculatorDefinition {
    let mut inputs = geometry;
    inputs.extend(mix_fields());
    let mut constants = mix_constants();
    constants.extend_from_slice(shape_constants);
    CalculatorDefinition {
        id,
        name,
        family: CalculatorFamily::Concrete,
        description,
        inputs,
        prices: mix_prices(),
        constants,
        compute,
    }
}

pub(crate) fn definitions() -> Vec<CalculatorDefinition> {
    vec![
        member(
            "concrete-column",
            "Concrete Column",
            "Cement, sand and aggregate for rectangular columns",
            vec![
                FieldSchema::millimeters("column_length", "column_length", "L"),
                FieldSchema::millimeters("column_width", "column_width", "W"),
                FieldSchema::meters("column_height", "column_height", "H"),
                FieldSchema::count("column_count", "column_count", "n"),
            ],
            &[],
            compute_column,
        ),
        member(
            "concrete-footing",
            "Concrete Footing",
            "Cement, sand and aggregate for isolated rectangular footings",
            vec![
                FieldSchema::meters("footing_length", "footing_length", "L"),
                FieldSchema::meters("footing_width", "footing_width", "W"),
                FieldSchema::millimeters("footing_depth", "footing_depth", "D"),
                FieldSchema::count("footing_count", "footing_count", "n"),
            ],
            &[],
            compute_footing,
        ),
        member(
            "concrete-wall",
            "Concrete Wall",
            "Cement, sand and aggregate for a cast-in-place wall",
            vec![
                FieldSchema::meters("wall_length", "wall_length", "l"),
                FieldSchema::meters("wall_height", "wall_height", "h"),
                FieldSchema::millimeters("wall_thickness", "wall_thickness", "t"),
            ],
            &[],
            compute_wall,
        ),
        member(
            "concrete-tube",
            "Concrete Tube",
            "Cement, sand and aggregate for hollow circular columns or pipes",
            vec![
                FieldSchema::millimeters("outer_diameter", "outer_diameter", "D"),
                FieldSchema::millimeters("inner_diameter", "inner_diameter", "d"),
                FieldSchema::meters("tube_height", "tube_height", "h"),
                FieldSchema::count("tube_count", "tube_count", "n"),
            ],
            &[Constant::new("π", PI, "")],
            compute_tube,
        ),
        member(
            "concrete-staircase",
            "Concrete Staircase",
            "Cement, sand and aggregate for a straight flight (steps plus waist slab)",
            vec![
                FieldSchema::millimeters("riser", "riser", "R"),
                FieldSchema::millimeters("tread", "tread", "G"),
                FieldSchema::count("steps", "steps", "N"),
                FieldSchema::meters("stair_width", "stair_width", "B"),
                FieldSchema::millimeters("waist_thickness", "waist_thickness", "w"),
            ],
            &[],
            compute_staircase,
        ),
        member(
            "concrete-gutter",
            "Concrete Gutter",
            "Cement, sand and aggregate for a U-shaped drain",
            vec![
                FieldSchema::meters("gutter_length", "gutter_length", "l"),
                FieldSchema::millimeters("outer_width", "outer_width", "Wo"),
                FieldSchema::millimeters("outer_height", "outer_height", "Ho"),
                FieldSchema::millimeters("inner_width", "inner_width", "Wi"),
                FieldSchema::millimeters("inner_height", "inner_height", "Hi"),
            ],
            &[],
            compute_gutter,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{normalize, CalculationInput};

    fn run(id: &str, raw: CalculationInput) -> Vec<FormulaResult> {
        let defs = definitions();
        let def = defs.iter().find(|d| d.id == id).unwrap();
        let raw = raw
            .with("cement_ratio", "1")
            .with("sand_ratio", "2")
            .with("aggregate_ratio", "4");
        def.run(&normalize(&raw, &def.inputs))
    }

    fn value(results: &[FormulaResult], key: &str) -> f64 {
        results.iter().find(|r| r.key == key).unwrap().value
    }

    #[test]
    fn test_column_mix() {
        let raw = CalculationInput::new()
            .with("column_length", "300")
            .with("column_width", "300")
            .with("column_height", "3")
            .with("column_count", "4");
        let results = run("concrete-column", raw);
        // 0.3 × 0.3 × 3 × 4 = 1.08 m³
        assert!((value(&results, "concrete_volume") - 1.08).abs() < 1e-12);
        let dry = 1.08 * 1.54;
        assert!((value(&results, "dry_volume") - dry).abs() < 1e-12);
        assert!((value(&results, "cement_bags") - dry / (7.0 * 0.035)).abs() < 1e-9);
        assert!((value(&results, "sand_volume") - 2.0 * dry / 7.0).abs() < 1e-12);
        assert!((value(&results, "aggregate_volume") - 4.0 * dry / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_staircase_volume() {
        let raw = CalculationInput::new()
            .with("riser", "150")
            .with("tread", "300")
            .with("steps", "10")
            .with("stair_width", "1")
            .with("waist_thickness", "150");
        let results = run("concrete-staircase", raw);
        let steps = 10.0 * 0.15 * 0.3 / 2.0;
        let waist = 10.0 * (0.15f64 * 0.15 + 0.3 * 0.3).sqrt() * 0.15;
        assert!((value(&results, "step_volume") - steps).abs() < 1e-12);
        assert!((value(&results, "waist_volume") - waist).abs() < 1e-12);
        assert!((value(&results, "concrete_volume") - (steps + waist)).abs() < 1e-12);
    }

    #[test]
    fn test_tube_with_inner_larger_than_outer_is_zero() {
        let raw = CalculationInput::new()
            .with("outer_diameter", "300")
            .with("inner_diameter", "400")
            .with("tube_height", "3")
            .with("tube_count", "1");
        let results = run("concrete-tube", raw);
        assert_eq!(value(&results, "concrete_volume"), 0.0);
        assert_eq!(value(&results, "cement_bags"), 0.0);
    }

    #[test]
    fn test_gutter_volume() {
        let raw = CalculationInput::new()
            .with("gutter_length", "10")
            .with("outer_width", "500")
            .with("outer_height", "400")
            .with("inner_width", "300")
            .with("inner_height", "300");
        let results = run("concrete-gutter", raw);
        // 10 × (0.2 − 0.09) = 1.1 m³
        assert!((value(&results, "concrete_volume") - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_ratio_gives_zero_materials() {
        let defs = definitions();
        let def = defs.iter().find(|d| d.id == "concrete-wall").unwrap();
        let raw = CalculationInput::new()
            .with("wall_length", "5")
            .with("wall_height", "3")
            .with("wall_thickness", "200");
        let results = def.run(&normalize(&raw, &def.inputs));
        assert!((value(&results, "concrete_volume") - 3.0).abs() < 1e-12);
        assert_eq!(value(&results, "cement_bags"), 0.0);
        assert_eq!(value(&results, "aggregate_volume"), 0.0);
    }
}
