//! # Plaster Formulas
//!
//! Two ways of sizing plaster work:
//!
//! - **By weight** (gypsum, premix): `weight = l × w × t × density`, then
//!   bags of a fixed weight.
//! - **By mix** (sand/cement): the wet volume is inflated by a swell factor
//!   of 1.6 to a dry volume, which is then apportioned by the `c:s` ratio.
//!
//! Thickness is entered in millimeters; length and width in meters.

use crate::cost::PriceField;
use crate::input::{FieldSchema, NormalizedInput};
use crate::units::Unit;

use super::{
    cement_sand_mortar, safe_div, CalculatorDefinition, CalculatorFamily, Constant, FormulaResult,
    CEMENT_BAG_VOLUME_M3,
};

/// Dry-volume swell factor for sand/cement plaster mortar
pub const PLASTER_DRY_FACTOR: f64 = 1.6;

/// Gypsum plaster bulk density (kg/m³)
pub const GYPSUM_DENSITY: f64 = 715.0;
/// Gypsum plaster bag weight (kg)
pub const GYPSUM_BAG_KG: f64 = 25.0;

/// Premixed cement plaster bulk density (kg/m³)
pub const PREMIX_DENSITY: f64 = 1440.0;
/// Premixed cement plaster bag weight (kg)
pub const PREMIX_BAG_KG: f64 = 50.0;

/// Material constants of a plaster sold by weight.
#[derive(Debug, Clone, Copy)]
struct BaggedPlaster {
    density: f64,
    bag_kg: f64,
    weight_formula: &'static str,
    bags_formula: &'static str,
}

const GYPSUM: BaggedPlaster = BaggedPlaster {
    density: GYPSUM_DENSITY,
    bag_kg: GYPSUM_BAG_KG,
    weight_formula: "l × w × t × 715",
    bags_formula: "Wt / 25",
};

const PREMIX: BaggedPlaster = BaggedPlaster {
    density: PREMIX_DENSITY,
    bag_kg: PREMIX_BAG_KG,
    weight_formula: "l × w × t × 1440",
    bags_formula: "Wt / 50",
};

fn bagged(input: &NormalizedInput, plaster: BaggedPlaster) -> Vec<FormulaResult> {
    let area = input.get("plaster_length") * input.get("plaster_width");
    let volume = area * input.get("plaster_thickness");
    let weight = volume * plaster.density;
    let bags = safe_div(weight, plaster.bag_kg);
    vec![
        FormulaResult::new("plaster_area", area, Unit::SquareMeter, "l × w"),
        FormulaResult::new("plaster_volume", volume, Unit::CubicMeter, "l × w × t"),
        FormulaResult::new("plaster_weight", weight, Unit::Kilogram, plaster.weight_formula),
        FormulaResult::new("plaster_bags", bags, Unit::Bags, plaster.bags_formula)
            .priced("bag_price", "plaster_cost"),
    ]
}

fn compute_gypsum(input: &NormalizedInput) -> Vec<FormulaResult> {
    bagged(input, GYPSUM)
}

fn compute_premix(input: &NormalizedInput) -> Vec<FormulaResult> {
    bagged(input, PREMIX)
}

fn compute_sand_plaster(input: &NormalizedInput) -> Vec<FormulaResult> {
    let area = input.get("plaster_length") * input.get("plaster_width");
    let wet = area * input.get("plaster_thickness");
    let dry = wet * PLASTER_DRY_FACTOR;
    let mut results = vec![
        FormulaResult::new("plaster_area", area, Unit::SquareMeter, "l × w"),
        FormulaResult::new("mortar_wet_volume", wet, Unit::CubicMeter, "l × w × t"),
        FormulaResult::new("mortar_dry_volume", dry, Unit::CubicMeter, "l × w × t × 1.6"),
    ];
    results.extend(cement_sand_mortar(
        input.get("cement_ratio"),
        input.get("sand_ratio"),
        dry,
    ));
    results
}

fn surface_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::meters("plaster_length", "plaster_length", "l"),
        FieldSchema::meters("plaster_width", "plaster_width", "w"),
        FieldSchema::millimeters("plaster_thickness", "plaster_thickness", "t"),
    ]
}

pub(crate) fn definitions() -> Vec<CalculatorDefinition> {
    let bag_price = PriceField::new("bag_price", "plaster_bag_price", Unit::Bags);

    let mut sand_inputs = surface_fields();
    sand_inputs.push(FieldSchema::ratio("cement_ratio", "cement_ratio", "c"));
    sand_inputs.push(FieldSchema::ratio("sand_ratio", "sand_ratio", "s"));

    vec![
        CalculatorDefinition {
            id: "gypsum-plaster",
            name: "Gypsum Plaster",
            family: CalculatorFamily::Plaster,
            description: "Bags of gypsum plaster for a wall or ceiling surface",
            inputs: surface_fields(),
            prices: vec![bag_price],
            constants: vec![
                Constant::new("Gypsum density", GYPSUM_DENSITY, "kg/m³"),
                Constant::new("Bag weight", GYPSUM_BAG_KG, "kg"),
            ],
            compute: compute_gypsum,
        },
        CalculatorDefinition {
            id: "premix-plaster",
            name: "Premix Cement Plaster",
            family: CalculatorFamily::Plaster,
            description: "Bags of ready-mixed cement plaster for a wall surface",
            inputs: surface_fields(),
            prices: vec![bag_price],
            constants: vec![
                Constant::new("Premix density", PREMIX_DENSITY, "kg/m³"),
                Constant::new("Bag weight", PREMIX_BAG_KG, "kg"),
            ],
            compute: compute_premix,
        },
        CalculatorDefinition {
            id: "sand-plaster",
            name: "Sand Cement Plaster",
            family: CalculatorFamily::Plaster,
            description: "Cement bags and sand for site-mixed plaster at a given c:s ratio",
            inputs: sand_inputs,
            prices: vec![
                PriceField::new("cement_price", "cement_price", Unit::Bags),
                PriceField::new("sand_price", "sand_price", Unit::CubicMeter),
            ],
            constants: vec![
                Constant::new("Dry-volume swell factor", PLASTER_DRY_FACTOR, ""),
                Constant::new("Cement bag volume", CEMENT_BAG_VOLUME_M3, "m³"),
            ],
            compute: compute_sand_plaster,
        },
    ]
}
