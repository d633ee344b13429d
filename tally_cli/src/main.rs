//! # Tally CLI Application
//!
//! Terminal front end for the tally_core calculation engine: list the
//! calculators, run one with `key=value` inputs and prices, and browse the
//! history file.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=tally_core=debug`).

mod cli;

use std::path::Path;

use chrono::Utc;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use tally_core::formulas::{registry, CalculatorFamily};
use tally_core::history::FileHistoryStore;
use tally_core::input::parse_decimal;
use tally_core::{
    derive_label, CalcError, CalcResult, CalculationInput, CalculationSession, Engine, EngineSettings,
    HistoryStore, PriceList,
};

use cli::{Cli, Commands, HistoryAction, OutputFormat};

const RULE: &str = "═══════════════════════════════════════════════════════════";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = match &cli.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };

    match cli.command {
        Commands::List => list(cli.format),
        Commands::Describe { id } => describe(&id, cli.format),
        Commands::Compute { id, inputs, prices, save } => {
            let raw: CalculationInput = inputs.into_iter().collect();
            let prices: PriceList = prices.into_iter().map(|(k, v)| (k, parse_decimal(&v))).collect();
            compute(&Engine::new(settings), &id, &raw, &prices, save.as_deref(), cli.format)
        }
        Commands::History { action } => match action {
            HistoryAction::List { store } => history_list(&store, cli.format),
            HistoryAction::Show { id, store } => history_show(&store, &id, cli.format),
        },
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(CalcError::serialization)?;
    println!("{}", json);
    Ok(())
}

fn list(format: OutputFormat) -> CalcResult<()> {
    if format == OutputFormat::Json {
        let entries: Vec<_> = registry::all()
            .iter()
            .map(|def| serde_json::json!({ "id": def.id, "name": def.name, "family": def.family }))
            .collect();
        return print_json(&entries);
    }

    for family in CalculatorFamily::all() {
        println!("{}", family.display_name());
        for def in registry::in_family(family) {
            println!("  {:<22} {}", def.id, def.name);
        }
        println!();
    }
    Ok(())
}

fn describe(id: &str, format: OutputFormat) -> CalcResult<()> {
    let def = registry::lookup(id)?;
    if format == OutputFormat::Json {
        return print_json(def);
    }

    println!("{}", RULE);
    println!("  {} ({})", def.name, def.id);
    println!("{}", RULE);
    println!("{}", def.description);
    println!();
    println!("Inputs:");
    for field in &def.inputs {
        println!("  {:<4} {:<28} [{}]", field.symbol, field.name, field.unit);
    }
    if !def.prices.is_empty() {
        println!();
        println!("Prices:");
        for price in &def.prices {
            println!("  {:<28} per {}", price.key, price.per);
        }
    }
    if !def.constants.is_empty() {
        println!();
        println!("Constants:");
        for constant in &def.constants {
            println!("  {:<28} {} {}", constant.name, constant.value, constant.unit);
        }
    }
    Ok(())
}

fn compute(
    engine: &Engine,
    id: &str,
    raw: &CalculationInput,
    prices: &PriceList,
    save: Option<&Path>,
    format: OutputFormat,
) -> CalcResult<()> {
    let session = engine.compute(id, raw, prices)?.into_session(Utc::now());

    if let Some(path) = save {
        // The computed session stands even if it cannot be stored
        let mut store = FileHistoryStore::new(path, current_user());
        match store.save(&session) {
            Ok(saved) => eprintln!("Saved as {}", saved),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "could not save calculation");
                eprintln!("Warning: not saved: {}", e);
            }
        }
    }

    match format {
        OutputFormat::Json => print_json(&session),
        OutputFormat::Table => {
            print_session(&session);
            Ok(())
        }
    }
}

fn history_list(store: &Path, format: OutputFormat) -> CalcResult<()> {
    let sessions = FileHistoryStore::new(store, current_user()).list()?;
    if format == OutputFormat::Json {
        return print_json(&sessions);
    }

    if sessions.is_empty() {
        println!("No saved calculations in {}", store.display());
        return Ok(());
    }
    for session in &sessions {
        println!(
            "{}  {}  {:<22} {:>14.2} {}",
            session.id,
            session.created.format("%Y-%m-%d %H:%M"),
            session.calculator_id,
            session.total_cost(),
            session.costs.first().map(|c| c.currency.as_str()).unwrap_or(""),
        );
    }
    Ok(())
}

fn history_show(store: &Path, id: &str, format: OutputFormat) -> CalcResult<()> {
    let id = Uuid::parse_str(id.trim()).map_err(|e| CalcError::invalid_input("id", id, e.to_string()))?;
    let session = FileHistoryStore::new(store, current_user()).get(id)?;
    match format {
        OutputFormat::Json => print_json(&session),
        OutputFormat::Table => {
            print_session(&session);
            Ok(())
        }
    }
}

fn print_session(session: &CalculationSession) {
    let name = registry::lookup(&session.calculator_id)
        .map(|def| def.name)
        .unwrap_or(session.calculator_id.as_str());

    println!("{}", RULE);
    println!("  {}", name.to_uppercase());
    println!("  {}  {}", session.id, session.created.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{}", RULE);
    println!();
    println!("Input:");
    for row in &session.detail.inputs {
        println!("  {:<6} {:<28} {}", row.symbol, derive_label(&row.label_key), row.value);
    }
    println!();
    println!("Result:");
    for row in &session.detail.outputs {
        println!("  {:<26} {:>18}   {}", derive_label(&row.title_key), row.value, row.formula);
    }
    println!();
    println!("{}", RULE);
    println!("  TOTAL: {:.2} {}", session.total_cost(), session.costs.first().map(|c| c.currency.as_str()).unwrap_or(""));
    println!("{}", RULE);
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "tally".to_string())
}
