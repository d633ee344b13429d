//! # Masonry Formulas
//!
//! Block and brick quantities from wall geometry.
//!
//! ## Notation
//!
//! - `L`, `W`, `T` = block/brick length, width, height (entered in mm)
//! - `m` = mortar joint thickness (entered in mm)
//! - `l`, `h`, `t` = wall length, height, thickness (m)
//! - `w1..w3`, `h1..h3` = door/window openings deducted from the wall (m)
//! - `V` = net wall volume, `N` = number of bricks
//! - `Nc` = courses, `Nh` / `Ns` = header / stretcher bricks of a bond
//!
//! Each brick is counted with a mortar joint on all three faces, so the
//! volume a single brick occupies in the wall is `(L + m) × (W + m) × (T + m)`.
//!
//! ## Example
//!
//! ```rust
//! use tally_core::formulas::masonry::brick_with_mortar_volume;
//!
//! // 600 × 200 × 100 mm AAC block, 5 mm joints
//! let vb = brick_with_mortar_volume(0.6, 0.2, 0.1, 0.005);
//! assert!((vb - 0.013022625).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

use crate::cost::PriceField;
use crate::input::{FieldSchema, NormalizedInput};
use crate::units::Unit;

use super::{
    cement_sand_mortar, non_negative, safe_div, CalculatorDefinition, CalculatorFamily, Constant,
    FormulaResult,
};

/// Dry-volume factor for brick masonry mortar (voids and bulking of sand)
pub const BRICK_MORTAR_DRY_FACTOR: f64 = 1.33;

/// Queen closers cut from one brick (split lengthwise)
pub const CLOSERS_PER_BRICK: f64 = 2.0;

const BRICK_PRICE: PriceField = PriceField::new("brick_price", "brick_price", Unit::Count);

// =============================================================================
// Formulas
// =============================================================================

/// Volume one brick occupies including its joints: `(L + m)(W + m)(T + m)`
pub fn brick_with_mortar_volume(length: f64, width: f64, height: f64, mortar: f64) -> f64 {
    (length + mortar) * (width + mortar) * (height + mortar)
}

/// Brick arrangement of a bonded wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bond {
    /// Half-brick wall laid in stretchers only
    Stretcher,
    /// One-brick wall, header courses alternating with stretcher courses
    English,
    /// One-brick wall, a header and a stretcher pair alternating in every course
    Flemish,
}

/// Header and stretcher bricks for `courses` courses of a wall `wall_length`
/// long. `stretcher_face` and `header_face` are the brick length and width
/// with their joint (`L + m`, `W + m`).
///
/// Returns `(headers, stretchers)`.
pub fn bond_bricks(bond: Bond, wall_length: f64, courses: f64, stretcher_face: f64, header_face: f64) -> (f64, f64) {
    match bond {
        Bond::Stretcher => (0.0, courses * safe_div(wall_length, stretcher_face)),
        Bond::English => {
            let half = courses / 2.0;
            (
                half * safe_div(wall_length, header_face),
                half * 2.0 * safe_div(wall_length, stretcher_face),
            )
        }
        Bond::Flemish => {
            let repeats = safe_div(wall_length, stretcher_face + header_face);
            (courses * repeats, courses * 2.0 * repeats)
        }
    }
}

/// Net wall volume `l·h·t − Σ(wᵢ·hᵢ)·t`, clamped at zero.
pub fn net_wall_volume(length: f64, height: f64, thickness: f64, openings: &[(f64, f64)]) -> f64 {
    let deducted: f64 = openings.iter().map(|(w, h)| w * h).sum();
    non_negative(length * height * thickness - deducted * thickness)
}

/// Volume of the ring wall of a circular tank or well: `π·h·((r + t)² − r²)`
pub fn ring_wall_volume(inner_radius: f64, thickness: f64, height: f64) -> f64 {
    let outer = inner_radius + thickness;
    non_negative(PI * height * (outer * outer - inner_radius * inner_radius))
}

// =============================================================================
// Shared Steps
// =============================================================================

fn wall_volume(input: &NormalizedInput) -> FormulaResult {
    let openings = [
        (input.get("opening_width_1"), input.get("opening_height_1")),
        (input.get("opening_width_2"), input.get("opening_height_2")),
        (input.get("opening_width_3"), input.get("opening_height_3")),
    ];
    let volume = net_wall_volume(
        input.get("wall_length"),
        input.get("wall_height"),
        input.get("wall_thickness"),
        &openings,
    );
    FormulaResult::new(
        "wall_volume",
        volume,
        Unit::CubicMeter,
        "l × h × t − (w1 × h1 + w2 × h2 + w3 × h3) × t",
    )
}

/// Brick-with-mortar volume and brick count for a wall volume `V`.
fn brick_count(input: &NormalizedInput, wall_volume: f64) -> [FormulaResult; 2] {
    let unit_volume = brick_with_mortar_volume(
        input.get("brick_length"),
        input.get("brick_width"),
        input.get("brick_height"),
        input.get("mortar_thickness"),
    );
    let bricks = safe_div(wall_volume, unit_volume);
    [
        FormulaResult::new(
            "brick_with_mortar_volume",
            unit_volume,
            Unit::CubicMeter,
            "(L + m) × (W + m) × (T + m)",
        )
        .with_precision(6),
        FormulaResult::new("no_of_bricks", bricks, Unit::Count, "V / ((L + m) × (W + m) × (T + m))")
            .with_precision(0)
            .priced("brick_price", "brick_cost"),
    ]
}

fn brick_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::millimeters("brick_length", "brick_length", "L"),
        FieldSchema::millimeters("brick_width", "brick_width", "W"),
        FieldSchema::millimeters("brick_height", "brick_height", "T"),
        FieldSchema::millimeters("mortar_thickness", "mortar_thickness", "m"),
    ]
}

fn wall_fields() -> Vec<FieldSchema> {
    vec![
        FieldSchema::meters("wall_length", "wall_length", "l"),
        FieldSchema::meters("wall_height", "wall_height", "h"),
        FieldSchema::meters("wall_thickness", "wall_thickness", "t"),
        FieldSchema::meters("opening_width_1", "opening_width", "w1"),
        FieldSchema::meters("opening_height_1", "opening_height", "h1"),
        FieldSchema::meters("opening_width_2", "opening_width", "w2"),
        FieldSchema::meters("opening_height_2", "opening_height", "h2"),
        FieldSchema::meters("opening_width_3", "opening_width", "w3"),
        FieldSchema::meters("opening_height_3", "opening_height", "h3"),
    ]
}

// =============================================================================
// Compute Functions
// =============================================================================

fn compute_aac_block(input: &NormalizedInput) -> Vec<FormulaResult> {
    let volume = wall_volume(input);
    let v = volume.value;
    let mut results = vec![volume];
    results.extend(brick_count(input, v));
    results
}

fn compute_brick_wall(input: &NormalizedInput) -> Vec<FormulaResult> {
    let volume = wall_volume(input);
    let v = volume.value;
    let [unit_volume, bricks] = brick_count(input, v);
    let n = bricks.value;

    let solid = n * input.get("brick_length") * input.get("brick_width") * input.get("brick_height");
    let wet = non_negative(v - solid);
    let dry = wet * BRICK_MORTAR_DRY_FACTOR;

    let mut results = vec![
        volume,
        unit_volume,
        bricks,
        FormulaResult::new("brick_volume", solid, Unit::CubicMeter, "N × L × W × T"),
        FormulaResult::new("mortar_wet_volume", wet, Unit::CubicMeter, "V − N × L × W × T"),
        FormulaResult::new("mortar_dry_volume", dry, Unit::CubicMeter, "Vm × 1.33"),
    ];
    results.extend(cement_sand_mortar(
        input.get("cement_ratio"),
        input.get("sand_ratio"),
        dry,
    ));
    results
}

fn compute_brick_closer(input: &NormalizedInput) -> Vec<FormulaResult> {
    let course_height = input.get("brick_height") + input.get("mortar_thickness");
    let courses = safe_div(input.get("wall_height"), course_height);
    let closers = courses * input.get("wall_ends");
    let bricks = closers / CLOSERS_PER_BRICK;
    vec![
        FormulaResult::new("courses", courses, Unit::Count, "h / (T + m)").with_precision(0),
        FormulaResult::new("queen_closers", closers, Unit::Count, "h / (T + m) × e").with_precision(0),
        FormulaResult::new("closer_bricks", bricks, Unit::Count, "Q / 2")
            .with_precision(0)
            .priced("brick_price", "brick_cost"),
    ]
}

fn compute_circular_wall(input: &NormalizedInput) -> Vec<FormulaResult> {
    let volume = ring_wall_volume(
        input.get("inner_radius"),
        input.get("wall_thickness"),
        input.get("wall_height"),
    );
    let mut results = vec![FormulaResult::new(
        "wall_volume",
        volume,
        Unit::CubicMeter,
        "π × h × ((r + t)² − r²)",
    )];
    results.extend(brick_count(input, volume));
    results
}

fn bonded_wall(input: &NormalizedInput, bond: Bond, formulas: [&str; 2]) -> Vec<FormulaResult> {
    let mortar = input.get("mortar_thickness");
    let courses = safe_div(input.get("wall_height"), input.get("brick_height") + mortar);
    let (headers, stretchers) = bond_bricks(
        bond,
        input.get("wall_length"),
        courses,
        input.get("brick_length") + mortar,
        input.get("brick_width") + mortar,
    );
    vec![
        FormulaResult::new("courses", courses, Unit::Count, "h / (T + m)").with_precision(0),
        FormulaResult::new("header_bricks", headers, Unit::Count, formulas[0]).with_precision(0),
        FormulaResult::new("stretcher_bricks", stretchers, Unit::Count, formulas[1]).with_precision(0),
        FormulaResult::new("no_of_bricks", headers + stretchers, Unit::Count, "Nh + Ns")
            .with_precision(0)
            .priced("brick_price", "brick_cost"),
    ]
}

fn compute_stretcher_bond(input: &NormalizedInput) -> Vec<FormulaResult> {
    bonded_wall(input, Bond::Stretcher, ["0", "Nc × l / (L + m)"])
}

fn compute_english_bond(input: &NormalizedInput) -> Vec<FormulaResult> {
    bonded_wall(input, Bond::English, ["Nc / 2 × l / (W + m)", "Nc / 2 × 2 × l / (L + m)"])
}

fn compute_flemish_bond(input: &NormalizedInput) -> Vec<FormulaResult> {
    bonded_wall(
        input,
        Bond::Flemish,
        ["Nc × l / ((L + m) + (W + m))", "Nc × 2 × l / ((L + m) + (W + m))"],
    )
}

// =============================================================================
// Definitions
// =============================================================================

fn bond(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    compute: super::ComputeFn,
) -> CalculatorDefinition {
    let mut inputs = brick_fields();
    inputs.extend([
        FieldSchema::meters("wall_length", "wall_length", "l"),
        FieldSchema::meters("wall_height", "wall_height", "h"),
    ]);
    CalculatorDefinition {
        id,
        name,
        family: CalculatorFamily::Masonry,
        description,
        inputs,
        prices: vec![BRICK_PRICE],
        constants: vec![],
        compute,
    }
}

pub(crate) fn definitions() -> Vec<CalculatorDefinition> {
    let mut brick_wall_inputs = brick_fields();
    brick_wall_inputs.extend(wall_fields());
    brick_wall_inputs.push(FieldSchema::ratio("cement_ratio", "cement_ratio", "c"));
    brick_wall_inputs.push(FieldSchema::ratio("sand_ratio", "sand_ratio", "s"));

    let mut circular_inputs = brick_fields();
    circular_inputs.extend([
        FieldSchema::meters("inner_radius", "inner_radius", "r"),
        FieldSchema::meters("wall_thickness", "wall_thickness", "t"),
        FieldSchema::meters("wall_height", "wall_height", "h"),
    ]);

    vec![
        CalculatorDefinition {
            id: "aac-block",
            name: "AAC Block Wall",
            family: CalculatorFamily::Masonry,
            description: "Number of autoclaved aerated concrete blocks for a wall with up to three openings",
            inputs: brick_fields().into_iter().chain(wall_fields()).collect(),
            prices: vec![BRICK_PRICE],
            constants: vec![],
            compute: compute_aac_block,
        },
        CalculatorDefinition {
            id: "brick-wall",
            name: "Brick Wall",
            family: CalculatorFamily::Masonry,
            description: "Bricks plus cement and sand for the mortar of a brick wall",
            inputs: brick_wall_inputs,
            prices: vec![
                BRICK_PRICE,
                PriceField::new("cement_price", "cement_price", Unit::Bags),
                PriceField::new("sand_price", "sand_price", Unit::CubicMeter),
            ],
            constants: vec![
                Constant::new("Mortar dry-volume factor", BRICK_MORTAR_DRY_FACTOR, ""),
                Constant::new("Cement bag volume", super::CEMENT_BAG_VOLUME_M3, "m³"),
            ],
            compute: compute_brick_wall,
        },
        CalculatorDefinition {
            id: "brick-closer",
            name: "Brick Closers",
            family: CalculatorFamily::Masonry,
            description: "Queen closers needed at wall ends to break vertical joints in bonded brickwork",
            inputs: vec![
                FieldSchema::meters("wall_height", "wall_height", "h"),
                FieldSchema::millimeters("brick_height", "brick_height", "T"),
                FieldSchema::millimeters("mortar_thickness", "mortar_thickness", "m"),
                FieldSchema::count("wall_ends", "wall_ends", "e"),
            ],
            prices: vec![BRICK_PRICE],
            constants: vec![Constant::new("Queen closers per brick", CLOSERS_PER_BRICK, "nos")],
            compute: compute_brick_closer,
        },
        CalculatorDefinition {
            id: "brick-circular-wall",
            name: "Circular Brick Wall",
            family: CalculatorFamily::Masonry,
            description: "Bricks for the ring wall of a circular well, tank or pillar",
            inputs: circular_inputs,
            prices: vec![BRICK_PRICE],
            constants: vec![Constant::new("π", PI, "")],
            compute: compute_circular_wall,
        },
        bond(
            "brick-stretcher-bond",
            "Stretcher Bond",
            "Half-brick wall laid in stretchers only",
            compute_stretcher_bond,
        ),
        bond(
            "brick-english-bond",
            "English Bond",
            "One-brick wall with alternate header and stretcher courses",
            compute_english_bond,
        ),
        bond(
            "brick-flemish-bond",
            "Flemish Bond",
            "One-brick wall with headers and stretcher pairs alternating in each course",
            compute_flemish_bond,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{normalize, CalculationInput};

    fn find<'a>(results: &'a [FormulaResult], key: &str) -> &'a FormulaResult {
        results.iter().find(|r| r.key == key).unwrap()
    }

    fn aac_input() -> CalculationInput {
        CalculationInput::new()
            .with("brick_length", "600")
            .with("brick_width", "200")
            .with("brick_height", "100")
            .with("mortar_thickness", "5")
            .with("wall_length", "5")
            .with("wall_height", "3")
            .with("wall_thickness", "0.1")
            .with("opening_width_1", "1")
            .with("opening_height_1", "2")
    }

    #[test]
    fn test_aac_block_wall() {
        let defs = definitions();
        let def = &defs[0];
        let results = def.run(&normalize(&aac_input(), &def.inputs));

        assert!((find(&results, "wall_volume").value - 1.3).abs() < 1e-9);
        assert!((find(&results, "brick_with_mortar_volume").value - 0.013022625).abs() < 1e-12);
        let bricks = find(&results, "no_of_bricks").value;
        assert!((bricks - 1.3 / 0.013022625).abs() < 1e-9);
        assert!((bricks - 99.8).abs() < 0.05);
    }

    #[test]
    fn test_openings_larger_than_wall_clamp_to_zero() {
        assert_eq!(net_wall_volume(1.0, 1.0, 0.2, &[(2.0, 2.0)]), 0.0);
    }

    #[test]
    fn test_zero_brick_size_yields_zero_bricks() {
        let defs = definitions();
        let def = &defs[0];
        let raw = CalculationInput::new()
            .with("wall_length", "5")
            .with("wall_height", "3")
            .with("wall_thickness", "0.1");
        let results = def.run(&normalize(&raw, &def.inputs));
        assert_eq!(find(&results, "no_of_bricks").value, 0.0);
    }

    #[test]
    fn test_brick_wall_mortar() {
        let defs = definitions();
        let def = defs.iter().find(|d| d.id == "brick-wall").unwrap();
        let raw = CalculationInput::new()
            .with("brick_length", "190")
            .with("brick_width", "90")
            .with("brick_height", "90")
            .with("mortar_thickness", "10")
            .with("wall_length", "10")
            .with("wall_height", "3")
            .with("wall_thickness", "0.2")
            .with("cement_ratio", "1")
            .with("sand_ratio", "6");
        let results = def.run(&normalize(&raw, &def.inputs));

        // 6 m³ / (0.2 × 0.1 × 0.1) = 3000 bricks
        let n = find(&results, "no_of_bricks").value;
        assert!((n - 3000.0).abs() < 1e-6);
        // 3000 × 0.19 × 0.09 × 0.09 = 4.617 m³ of brick, 1.383 m³ of mortar
        assert!((find(&results, "mortar_wet_volume").value - 1.383).abs() < 1e-9);
        let dry = 1.383 * 1.33;
        assert!((find(&results, "mortar_dry_volume").value - dry).abs() < 1e-9);
        assert!((find(&results, "cement_bags").value - dry / (7.0 * 0.035)).abs() < 1e-9);
        assert!((find(&results, "sand_volume").value - 6.0 * dry / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_brick_closers() {
        let defs = definitions();
        let def = defs.iter().find(|d| d.id == "brick-closer").unwrap();
        let raw = CalculationInput::new()
            .with("wall_height", "3")
            .with("brick_height", "90")
            .with("mortar_thickness", "10")
            .with("wall_ends", "2");
        let results = def.run(&normalize(&raw, &def.inputs));
        assert!((find(&results, "courses").value - 30.0).abs() < 1e-9);
        assert!((find(&results, "queen_closers").value - 60.0).abs() < 1e-9);
        assert!((find(&results, "closer_bricks").value - 30.0).abs() < 1e-9);
    }

    fn bond_input() -> CalculationInput {
        CalculationInput::new()
            .with("brick_length", "190")
            .with("brick_width", "90")
            .with("brick_height", "90")
            .with("mortar_thickness", "10")
            .with("wall_length", "10")
            .with("wall_height", "3")
    }

    fn run_bond(id: &str) -> Vec<FormulaResult> {
        let defs = definitions();
        let def = defs.iter().find(|d| d.id == id).unwrap();
        def.run(&normalize(&bond_input(), &def.inputs))
    }

    #[test]
    fn test_stretcher_bond() {
        let results = run_bond("brick-stretcher-bond");
        assert!((find(&results, "courses").value - 30.0).abs() < 1e-6);
        assert_eq!(find(&results, "header_bricks").value, 0.0);
        // 30 courses × 10 / 0.2
        assert!((find(&results, "stretcher_bricks").value - 1500.0).abs() < 1e-6);
        assert!((find(&results, "no_of_bricks").value - 1500.0).abs() < 1e-6);
    }

    #[test]
    fn test_english_bond() {
        let results = run_bond("brick-english-bond");
        // 15 header courses of 100, 15 stretcher courses of 2 × 50
        assert!((find(&results, "header_bricks").value - 1500.0).abs() < 1e-6);
        assert!((find(&results, "stretcher_bricks").value - 1500.0).abs() < 1e-6);
        assert!((find(&results, "no_of_bricks").value - 3000.0).abs() < 1e-6);
    }

    #[test]
    fn test_flemish_bond() {
        let results = run_bond("brick-flemish-bond");
        // 10 / 0.3 repeats per course, one header and two stretchers each
        assert!((find(&results, "header_bricks").value - 1000.0).abs() < 1e-6);
        assert!((find(&results, "stretcher_bricks").value - 2000.0).abs() < 1e-6);
        assert!(find(&results, "no_of_bricks").price.is_some());
    }

    #[test]
    fn test_one_brick_bonds_match_wall_volume() {
        // A one-brick wall of the same face holds the same bricks in either bond
        let english = find(&run_bond("brick-english-bond"), "no_of_bricks").value;
        let flemish = find(&run_bond("brick-flemish-bond"), "no_of_bricks").value;
        assert!((english - flemish).abs() < 1e-6);
    }

    #[test]
    fn test_bond_with_zero_brick_size() {
        assert_eq!(bond_bricks(Bond::Flemish, 10.0, 30.0, 0.0, 0.0), (0.0, 0.0));
        assert_eq!(bond_bricks(Bond::Stretcher, 10.0, 30.0, 0.0, 0.1), (0.0, 0.0));
    }

    #[test]
    fn test_ring_wall_volume() {
        // r = 1, t = 0.2, h = 2: π × 2 × (1.44 − 1) = 0.88π
        let v = ring_wall_volume(1.0, 0.2, 2.0);
        assert!((v - 0.88 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_circular_wall_bricks_and_cost() {
        use crate::cost::{compose_costs, PriceList};

        let defs = definitions();
        let def = defs.iter().find(|d| d.id == "brick-circular-wall").unwrap();
        let raw = CalculationInput::new()
            .with("brick_length", "190")
            .with("brick_width", "90")
            .with("brick_height", "90")
            .with("mortar_thickness", "10")
            .with("inner_radius", "1")
            .with("wall_thickness", "0.2")
            .with("wall_height", "2");
        let results = def.run(&normalize(&raw, &def.inputs));

        assert!((find(&results, "wall_volume").value - 0.88 * PI).abs() < 1e-9);
        assert!((find(&results, "brick_with_mortar_volume").value - 0.002).abs() < 1e-12);
        // 0.88π / 0.002 = 440π ≈ 1382.3
        let bricks = find(&results, "no_of_bricks");
        assert!((bricks.value - 440.0 * PI).abs() < 1e-6);
        assert_eq!(bricks.precision, Some(0));

        let prices: PriceList = [("brick_price".to_string(), 8.0)].into_iter().collect();
        let costs = compose_costs(&results, &prices, "INR");
        assert_eq!(costs.len(), 2);
        assert_eq!(costs[0].label, "brick_cost");
        assert!((costs[0].total_cost - 3520.0 * PI).abs() < 1e-6);
        assert!((costs[1].total_cost - costs[0].total_cost).abs() < 1e-9);
    }
}
