//! # Steel Reinforcement Formulas
//!
//! Bar weights use the site rule `D² / 162` kg per meter, with the bar
//! diameter `D` in millimeters (it is the steel density 7850 kg/m³ times
//! the bar area, rounded into a single divisor).
//!
//! Member dimensions, cover and spacing are entered in millimeters and used
//! in meters. Bar counts across a width are `⌊clear span / spacing⌋ + 1`,
//! and zero when the spacing or clear span is not positive. Ties and
//! stirrups get a hook allowance of `24 × diameter` on top of the
//! perimeter inside the cover; a perimeter that the cover eats up entirely
//! is taken as zero.

use crate::cost::PriceField;
use crate::input::{FieldSchema, NormalizedInput};
use crate::units::{Kilograms, Tonnes, Unit};

use super::{
    bar_count, non_negative, steel_unit_weight, CalculatorDefinition, CalculatorFamily, Constant,
    FormulaResult, STEEL_WEIGHT_DIVISOR,
};

/// Hook allowance for a closed tie or stirrup, in bar diameters
pub const HOOK_ALLOWANCE_DIAMETERS: f64 = 24.0;

/// Length of one closed tie/stirrup in meters.
///
/// `b`, `d`, `cover` in meters; `diameter_mm` in millimeters.
pub fn link_length(b: f64, d: f64, cover: f64, diameter_mm: f64) -> f64 {
    let perimeter = non_negative(2.0 * ((b - 2.0 * cover) + (d - 2.0 * cover)));
    perimeter + HOOK_ALLOWANCE_DIAMETERS * diameter_mm / 1000.0
}

/// Total weight line (priced) followed by the tonnage line.
fn totals(weight_kg: f64, formula: &str) -> [FormulaResult; 2] {
    let tonnes: Tonnes = Kilograms(weight_kg).into();
    [
        FormulaResult::new("steel_weight", weight_kg, Unit::Kilogram, formula)
            .priced("steel_price", "steel_cost"),
        FormulaResult::new("steel_tonnage", tonnes.value(), Unit::Tonne, "Ws / 1000"),
    ]
}

fn compute_bar_weight(input: &NormalizedInput) -> Vec<FormulaResult> {
    let per_meter = steel_unit_weight(input.get("bar_diameter"));
    let weight = per_meter * input.get("bar_length") * input.get("bar_count");
    let mut results = vec![FormulaResult::new("unit_weight", per_meter, Unit::KilogramPerMeter, "D² / 162")];
    results.extend(totals(weight, "D² / 162 × L × n"));
    results
}

fn compute_column(input: &NormalizedInput) -> Vec<FormulaResult> {
    let height = input.get("column_height");
    let columns = input.get("column_count");
    let tie_dia = input.get("tie_diameter");

    let main = input.get("main_bar_count") * height * steel_unit_weight(input.get("main_bar_diameter")) * columns;
    let ties = bar_count(height, input.get("tie_spacing")) * columns;
    let tie_len = link_length(
        input.get("column_width"),
        input.get("column_depth"),
        input.get("clear_cover"),
        tie_dia,
    );
    let tie_weight = ties * tie_len * steel_unit_weight(tie_dia);

    let mut results = vec![
        FormulaResult::new("main_bar_weight", main, Unit::Kilogram, "n × H × D² / 162 × k"),
        FormulaResult::new("tie_count", ties, Unit::Count, "(⌊H / s⌋ + 1) × k").with_precision(0),
        FormulaResult::new("tie_length", tie_len, Unit::Meter, "2 × ((b − 2c) + (d − 2c)) + 24 × dt / 1000"),
        FormulaResult::new("tie_weight", tie_weight, Unit::Kilogram, "Nt × Lt × dt² / 162"),
    ];
    results.extend(totals(main + tie_weight, "Wm + Wt"));
    results
}

fn compute_beam(input: &NormalizedInput) -> Vec<FormulaResult> {
    let span = input.get("beam_span");
    let stirrup_dia = input.get("stirrup_diameter");

    let top = input.get("top_bar_count") * span * steel_unit_weight(input.get("top_bar_diameter"));
    let bottom = input.get("bottom_bar_count") * span * steel_unit_weight(input.get("bottom_bar_diameter"));
    let stirrups = bar_count(span, input.get("stirrup_spacing"));
    let stirrup_len = link_length(
        input.get("beam_width"),
        input.get("beam_depth"),
        input.get("clear_cover"),
        stirrup_dia,
    );
    let stirrup_weight = stirrups * stirrup_len * steel_unit_weight(stirrup_dia);

    let mut results = vec![
        FormulaResult::new("top_bar_weight", top, Unit::Kilogram, "nt × L × Dt² / 162"),
        FormulaResult::new("bottom_bar_weight", bottom, Unit::Kilogram, "nb × L × Db² / 162"),
        FormulaResult::new("stirrup_count", stirrups, Unit::Count, "⌊L / s⌋ + 1").with_precision(0),
        FormulaResult::new(
            "stirrup_length",
            stirrup_len,
            Unit::Meter,
            "2 × ((b − 2c) + (d − 2c)) + 24 × ds / 1000",
        ),
        FormulaResult::new("stirrup_weight", stirrup_weight, Unit::Kilogram, "Ns × Ls × ds² / 162"),
    ];
    results.extend(totals(top + bottom + stirrup_weight, "Wtop + Wbot + Wst"));
    results
}

fn compute_footing(input: &NormalizedInput) -> Vec<FormulaResult> {
    let cover = input.get("clear_cover");
    let spacing = input.get("bar_spacing");
    let clear_length = non_negative(input.get("footing_length") - 2.0 * cover);
    let clear_width = non_negative(input.get("footing_width") - 2.0 * cover);

    let along_length = bar_count(clear_width, spacing);
    let along_width = bar_count(clear_length, spacing);
    let weight = (along_length * clear_length + along_width * clear_width)
        * steel_unit_weight(input.get("bar_diameter"));

    let mut results = vec![
        FormulaResult::new("bars_along_length", along_length, Unit::Count, "⌊(Wf − 2c) / s⌋ + 1")
            .with_precision(0),
        FormulaResult::new("bars_along_width", along_width, Unit::Count, "⌊(Lf − 2c) / s⌋ + 1")
            .with_precision(0),
    ];
    results.extend(totals(weight, "(Nl × (Lf − 2c) + Nw × (Wf − 2c)) × D² / 162"));
    results
}

fn compute_slab(input: &NormalizedInput) -> Vec<FormulaResult> {
    let cover = input.get("clear_cover");
    let clear_x = non_negative(input.get("slab_length") - 2.0 * cover);
    let clear_y = non_negative(input.get("slab_width") - 2.0 * cover);

    let main_count = bar_count(clear_y, input.get("main_bar_spacing"));
    let main_weight = main_count * clear_x * steel_unit_weight(input.get("main_bar_diameter"));
    let dist_count = bar_count(clear_x, input.get("distribution_bar_spacing"));
    let dist_weight = dist_count * clear_y * steel_unit_weight(input.get("distribution_bar_diameter"));

    let mut results = vec![
        FormulaResult::new("main_bar_count", main_count, Unit::Count, "⌊(Ly − 2c) / sm⌋ + 1").with_precision(0),
        FormulaResult::new("main_bar_weight", main_weight, Unit::Kilogram, "Nm × (Lx − 2c) × Dm² / 162"),
        FormulaResult::new("distribution_bar_count", dist_count, Unit::Count, "⌊(Lx − 2c) / sd⌋ + 1")
            .with_precision(0),
        FormulaResult::new(
            "distribution_bar_weight",
            dist_weight,
            Unit::Kilogram,
            "Nd × (Ly − 2c) × Dd² / 162",
        ),
    ];
    results.extend(totals(main_weight + dist_weight, "Wm + Wd"));
    results
}

// =============================================================================
// Definitions
// =============================================================================

fn steel(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    inputs: Vec<FieldSchema>,
    compute: super::ComputeFn,
) -> CalculatorDefinition {
    let mut constants = vec![Constant::new("Unit weight divisor", STEEL_WEIGHT_DIVISOR, "mm²·m/kg")];
    if inputs.iter().any(|f| f.name == "tie_diameter" || f.name == "stirrup_diameter") {
        constants.push(Constant::new("Hook allowance", HOOK_ALLOWANCE_DIAMETERS, "× diameter"));
    }
    CalculatorDefinition {
        id,
        name,
        family: CalculatorFamily::Steel,
        description,
        inputs,
        prices: vec![PriceField::new("steel_price", "steel_price", Unit::Kilogram)],
        constants,
        compute,
    }
}

pub(crate) fn definitions() -> Vec<CalculatorDefinition> {
    vec![
        steel(
            "steel-weight",
            "Steel Bar Weight",
            "Weight of straight bars of one diameter",
            vec![
                FieldSchema::diameter("bar_diameter", "bar_diameter", "D"),
                FieldSchema::meters("bar_length", "bar_length", "L"),
                FieldSchema::count("bar_count", "bar_count", "n"),
            ],
            compute_bar_weight,
        ),
        steel(
            "steel-column",
            "Column Reinforcement",
            "Main bars and closed ties for rectangular columns",
            vec![
                FieldSchema::millimeters("column_width", "column_width", "b"),
                FieldSchema::millimeters("column_depth", "column_depth", "d"),
                FieldSchema::meters("column_height", "column_height", "H"),
                FieldSchema::millimeters("clear_cover", "clear_cover", "c"),
                FieldSchema::count("main_bar_count", "main_bar_count", "n"),
                FieldSchema::diameter("main_bar_diameter", "main_bar_diameter", "D"),
                FieldSchema::diameter("tie_diameter", "tie_diameter", "dt"),
                FieldSchema::millimeters("tie_spacing", "tie_spacing", "s"),
                FieldSchema::count("column_count", "column_count", "k"),
            ],
            compute_column,
        ),
        steel(
            "steel-beam",
            "Beam Reinforcement",
            "Top and bottom bars plus stirrups for a rectangular beam",
            vec![
                FieldSchema::millimeters("beam_width", "beam_width", "b"),
                FieldSchema::millimeters("beam_depth", "beam_depth", "d"),
                FieldSchema::meters("beam_span", "beam_span", "L"),
                FieldSchema::millimeters("clear_cover", "clear_cover", "c"),
                FieldSchema::count("top_bar_count", "top_bar_count", "nt"),
                FieldSchema::diameter("top_bar_diameter", "top_bar_diameter", "Dt"),
                FieldSchema::count("bottom_bar_count", "bottom_bar_count", "nb"),
                FieldSchema::diameter("bottom_bar_diameter", "bottom_bar_diameter", "Db"),
                FieldSchema::diameter("stirrup_diameter", "stirrup_diameter", "ds"),
                FieldSchema::millimeters("stirrup_spacing", "stirrup_spacing", "s"),
            ],
            compute_beam,
        ),
        steel(
            "steel-footing",
            "Footing Reinforcement",
            "Bottom mesh of an isolated footing, same bar both ways",
            vec![
                FieldSchema::meters("footing_length", "footing_length", "Lf"),
                FieldSchema::meters("footing_width", "footing_width", "Wf"),
                FieldSchema::millimeters("clear_cover", "clear_cover", "c"),
                FieldSchema::diameter("bar_diameter", "bar_diameter", "D"),
                FieldSchema::millimeters("bar_spacing", "bar_spacing", "s"),
            ],
            compute_footing,
        ),
        steel(
            "steel-slab",
            "Slab Reinforcement",
            "Main and distribution bars of a one-way slab",
            vec![
                FieldSchema::meters("slab_length", "slab_length", "Lx"),
                FieldSchema::meters("slab_width", "slab_width", "Ly"),
                FieldSchema::millimeters("clear_cover", "clear_cover", "c"),
                FieldSchema::diameter("main_bar_diameter", "main_bar_diameter", "Dm"),
                FieldSchema::millimeters("main_bar_spacing", "main_bar_spacing", "sm"),
                FieldSchema::diameter("distribution_bar_diameter", "distribution_bar_diameter", "Dd"),
                FieldSchema::millimeters("distribution_bar_spacing", "distribution_bar_spacing", "sd"),
            ],
            compute_slab,
        ),
    ]
}
