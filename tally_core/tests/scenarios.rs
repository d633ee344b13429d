//! End-to-end checks through the public API.

use chrono::Utc;
use tally_core::history::{FileHistoryStore, HistoryStore, MemoryHistory};
use tally_core::{
    compute, derive_label, CalculationInput, CalculatorState, CostKind, Engine, EngineSettings, PriceList,
};

fn prices(pairs: &[(&str, f64)]) -> PriceList {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn aac_scenario() -> CalculationInput {
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

fn sand_plaster_scenario() -> CalculationInput {
    CalculationInput::new()
        .with("plaster_length", "4")
        .with("plaster_width", "3")
        .with("plaster_thickness", "12")
        .with("cement_ratio", "1")
        .with("sand_ratio", "6")
}

#[test]
fn aac_block_wall_with_one_opening() {
    let output = compute("aac-block", &aac_scenario(), &prices(&[("brick_price", 50.0)])).unwrap();

    let volume = output.quantity("wall_volume").unwrap();
    assert!((volume - 1.3).abs() < 1e-9);

    let unit = output.quantity("brick_with_mortar_volume").unwrap();
    assert!((unit - 0.605 * 0.205 * 0.105).abs() < 1e-12);

    let bricks = output.quantity("no_of_bricks").unwrap();
    assert!((bricks - 99.826_264).abs() < 1e-5);

    let brick_cost = &output.costs[0];
    assert_eq!(brick_cost.label, "brick_cost");
    assert_eq!(brick_cost.kind, CostKind::Component);
    assert!((brick_cost.total_cost - 4991.313).abs() < 1e-3);
    assert!((output.total_cost() - brick_cost.total_cost).abs() < 1e-9);

    let agg = output.aggregate();
    assert_eq!(agg.material_quantity["wall_volume"], 1.3);
    assert_eq!(agg.material_quantity["brick_with_mortar_volume"], 0.013023);
    assert_eq!(agg.material_quantity["no_of_bricks_nos"], 100.0);
    assert_eq!(agg.work_cost_breakdown["brick_cost_inr"], 4991.313);
}

#[test]
fn sand_plaster_mix() {
    let output = compute(
        "sand-plaster",
        &sand_plaster_scenario(),
        &prices(&[("cement_price", 400.0), ("sand_price", 1500.0)]),
    )
    .unwrap();

    assert!((output.quantity("mortar_dry_volume").unwrap() - 0.2304).abs() < 1e-12);
    assert!((output.quantity("cement_bags").unwrap() - 0.940_408).abs() < 1e-6);
    assert!((output.quantity("sand_volume").unwrap() - 0.197_486).abs() < 1e-6);

    let agg = output.aggregate();
    assert_eq!(agg.material_quantity["cement_bags_nos"], 0.94);
    assert_eq!(agg.material_quantity["sand_volume"], 0.197);
    assert_eq!(agg.work_cost_breakdown["cement_cost_inr"], 376.163);
    assert_eq!(agg.work_cost_breakdown["sand_cost_inr"], 296.229);
    assert_eq!(agg.work_cost_breakdown["total_cost_inr"], 672.392);
}

#[test]
fn junk_input_reads_as_zero() {
    let raw = CalculationInput::new()
        .with("wall_length", "five")
        .with("wall_height", "")
        .with("wall_thickness", "NaN");
    let output = compute("aac-block", &raw, &PriceList::new()).unwrap();
    assert_eq!(output.quantity("wall_volume"), Some(0.0));
    assert_eq!(output.quantity("no_of_bricks"), Some(0.0));
    assert!(output.detail.inputs.iter().any(|row| row.value == "0 m"));
}

#[test]
fn zero_mix_ratio_is_guarded() {
    let raw = sand_plaster_scenario().with("cement_ratio", "0").with("sand_ratio", "0");
    let output = compute("sand-plaster", &raw, &prices(&[("cement_price", 400.0)])).unwrap();
    assert_eq!(output.quantity("cement_bags"), Some(0.0));
    assert_eq!(output.total_cost(), 0.0);
}

#[test]
fn unknown_calculator_is_an_error() {
    let err = compute("does-not-exist", &CalculationInput::new(), &PriceList::new()).unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_CALCULATOR_TYPE");
}

#[test]
fn reset_and_recalculate_is_identical() {
    let engine = Engine::default();
    let p = prices(&[("brick_price", 50.0)]);
    let mut state = CalculatorState::default();

    let first = state.calculate(&engine, "aac-block", &aac_scenario(), &p, Utc::now()).unwrap().clone();
    state.reset();
    let second = state.calculate(&engine, "aac-block", &aac_scenario(), &p, Utc::now()).unwrap().clone();

    assert_eq!(first.quantities, second.quantities);
    assert_eq!(first.costs, second.costs);
    assert_eq!(first.detail, second.detail);
}

#[test]
fn stored_keys_round_trip_to_labels() {
    let output = compute("sand-plaster", &sand_plaster_scenario(), &PriceList::new()).unwrap();
    let agg = output.aggregate();
    let labels: Vec<String> = agg.material_quantity.keys().map(|k| derive_label(k)).collect();
    assert!(labels.contains(&"Cement Bags".to_string()));
    assert!(labels.contains(&"Sand Volume".to_string()));

    let cost_labels: Vec<String> = agg.work_cost_breakdown.keys().map(|k| derive_label(k)).collect();
    assert!(cost_labels.contains(&"Cement Cost".to_string()));
    assert!(cost_labels.contains(&"Total Cost".to_string()));
}

#[test]
fn payload_json_shape() {
    let output = compute("aac-block", &aac_scenario(), &prices(&[("brick_price", 50.0)])).unwrap();
    let mut session = output.into_session(Utc::now());
    session.attach_insights(serde_json::json!({"advice": "order 5% extra"}));

    let json = serde_json::to_value(&session.payload).unwrap();
    let calculation = json["calculation"].as_object().unwrap();
    assert_eq!(calculation.len(), 2);
    assert_eq!(json["calculation"]["material_quantity"]["no_of_bricks_nos"], 100.0);
    assert_eq!(json["ai_insights"]["advice"], "order 5% extra");
}

#[test]
fn settings_change_precision_and_currency() {
    let engine = Engine::new(EngineSettings {
        precision: 2,
        currency: "USD".to_string(),
    });
    let output = engine
        .compute("sand-plaster", &sand_plaster_scenario(), &prices(&[("sand_price", 1500.0)]))
        .unwrap();
    let agg = output.aggregate();
    assert_eq!(agg.material_quantity["sand_volume"], 0.2);
    assert_eq!(agg.work_cost_breakdown["sand_cost_inr"], 296.23);
    assert!(output.costs.iter().all(|c| c.currency == "USD"));
}

#[test]
fn cost_keys_round_trip_in_any_currency() {
    let engine = Engine::new(EngineSettings {
        precision: 2,
        currency: "USD".to_string(),
    });
    let output = engine
        .compute(
            "sand-plaster",
            &sand_plaster_scenario(),
            &prices(&[("cement_price", 400.0), ("sand_price", 1500.0)]),
        )
        .unwrap();
    let labels: Vec<String> = output.aggregate().work_cost_breakdown.keys().map(|k| derive_label(k)).collect();
    assert_eq!(labels, ["Cement Cost", "Sand Cost", "Total Cost"]);
}

#[test]
fn memory_history_round_trip() {
    let mut history = MemoryHistory::new();
    let session = compute("brick-wall", &CalculationInput::new(), &PriceList::new())
        .unwrap()
        .into_session(Utc::now());
    let id = history.save(&session).unwrap();
    assert_eq!(history.get(id).unwrap().id, session.id);
    assert_eq!(history.list().unwrap().len(), 1);
}

#[test]
fn file_history_survives_reopen() {
    let path = std::env::temp_dir().join("tally_integration_history.json");
    let _ = std::fs::remove_file(&path);

    let session = compute("sand-plaster", &sand_plaster_scenario(), &PriceList::new())
        .unwrap()
        .into_session(Utc::now());

    let mut store = FileHistoryStore::new(&path, "integration");
    store.save(&session).unwrap();

    let reopened = FileHistoryStore::new(&path, "integration");
    let loaded = reopened.get(session.id).unwrap();
    assert_eq!(loaded.calculator_id, "sand-plaster");
    assert_eq!(loaded.payload.calculation.material_quantity.len(), session.payload.calculation.material_quantity.len());

    let _ = std::fs::remove_file(&path);
}
