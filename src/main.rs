use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mealguard::cli::{Cli, Command};
use mealguard::config::EngineConfig;
use mealguard::engine::{
    allocate, classify, plan_menu_servings, weekly_report, TextureVariantResolver,
};
use mealguard::error::{EngineError, Result};
use mealguard::interface::{
    confirm_save, display_breakdown, display_classification, display_menu_plan,
    display_texture_requirements, display_variant, display_weekly_report,
};
use mealguard::models::Texture;
use mealguard::state::{
    load_snapshot, save_snapshot, MenuProvider, ResidentProvider, SnapshotStore,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let path = Path::new(&cli.file);
    if !path.exists() {
        return Err(EngineError::InvalidInput(format!(
            "snapshot file not found: {}",
            cli.file
        )));
    }

    let mut store = SnapshotStore::new(load_snapshot(path)?);
    info!(
        dishes = store.dish_count(),
        residents = store.resident_count(),
        "loaded snapshot"
    );

    match cli.command {
        Command::Allocate {
            dish,
            institution,
            date,
        } => cmd_allocate(&store, &config, &dish, institution, date, cli.json),
        Command::Classify {
            dish,
            resident,
            date,
        } => cmd_classify(&store, &config, &dish, resident, date, cli.json),
        Command::Variant { dish, texture, yes } => {
            cmd_variant(&mut store, path, &dish, &texture, yes, cli.json)
        }
        Command::Textures {
            dish,
            institution,
            date,
            yes,
        } => cmd_textures(&mut store, path, &dish, institution, date, yes, cli.json),
        Command::Plan { menu, date, yes } => {
            cmd_plan(&mut store, path, &config, menu, date, yes, cli.json)
        }
        Command::Report { menu } => cmd_report(&store, &config, menu, cli.json),
    }
}

fn parse_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| EngineError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", s))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Partition an institution's residents for one dish.
fn cmd_allocate(
    store: &SnapshotStore,
    config: &EngineConfig,
    dish: &str,
    institution: u64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let dish = store.find_dish(dish)?;
    let residents = store.list_for_institution(institution, date)?;

    let breakdown = allocate(&dish, &residents, date, config);

    if json {
        print_json(&breakdown)
    } else {
        display_breakdown(&breakdown);
        Ok(())
    }
}

/// Check one resident against one dish.
fn cmd_classify(
    store: &SnapshotStore,
    config: &EngineConfig,
    dish: &str,
    resident: u64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let dish = store.find_dish(dish)?;
    let resident = store.get_resident(resident)?;

    let classification = classify(&dish, &resident, date, config);

    if json {
        print_json(&classification)
    } else {
        display_classification(&dish.name, &resident.name, &classification);
        Ok(())
    }
}

/// Resolve a texture variant, saving the snapshot when one was created.
fn cmd_variant(
    store: &mut SnapshotStore,
    path: &Path,
    dish: &str,
    texture: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let target = Texture::parse(texture).ok_or_else(|| {
        EngineError::InvalidInput(format!(
            "unknown texture '{}', expected regular, minced or pureed",
            texture
        ))
    })?;
    let dish = store.find_dish(dish)?;

    let result = TextureVariantResolver::new(store).resolve(&dish, target)?;

    if json {
        print_json(&result)?;
    } else {
        display_variant(&dish.name, &result);
    }

    if result.created && confirm_save(yes)? {
        save_snapshot(path, &store.to_snapshot())?;
        println!("Snapshot saved.");
    }

    Ok(())
}

/// Texture requirements of an institution for one dish.
fn cmd_textures(
    store: &mut SnapshotStore,
    path: &Path,
    dish: &str,
    institution: u64,
    date: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let dish = store.find_dish(dish)?;
    let residents = store.list_for_institution(institution, date)?;

    let reqs = TextureVariantResolver::new(store).check_group_requirements(&dish, &residents)?;

    if json {
        print_json(&reqs)?;
    } else {
        display_texture_requirements(&dish.name, &reqs);
    }

    if reqs.iter().any(|r| r.variant.created) && confirm_save(yes)? {
        save_snapshot(path, &store.to_snapshot())?;
        println!("Snapshot saved.");
    }

    Ok(())
}

/// Compute servings for a menu and persist the auto-calculated ones.
fn cmd_plan(
    store: &mut SnapshotStore,
    path: &Path,
    config: &EngineConfig,
    menu_id: u64,
    date: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let menu = store.get_menu(menu_id)?;
    let as_of = menu.week_start.unwrap_or(date);
    let residents = store.list_for_institution(menu.institution_id, as_of)?;

    let allocations = plan_menu_servings(&menu, store, &residents, date, config)?;

    if json {
        print_json(&allocations)?;
    } else {
        display_menu_plan(&allocations);
    }

    let auto: Vec<_> = allocations.iter().filter(|a| a.auto).collect();
    if auto.is_empty() {
        return Ok(());
    }

    if confirm_save(yes)? {
        for a in &auto {
            store.set_menu_item_servings(menu_id, a.item_index, a.servings)?;
        }
        save_snapshot(path, &store.to_snapshot())?;
        println!("Saved servings for {} menu items.", auto.len());
    }

    Ok(())
}

/// Weekly nutrition report for a menu.
fn cmd_report(store: &SnapshotStore, config: &EngineConfig, menu_id: u64, json: bool) -> Result<()> {
    let menu = store.get_menu(menu_id)?;
    let report = weekly_report(&menu, store, config)?;

    if json {
        print_json(&report)
    } else {
        display_weekly_report(&report);
        Ok(())
    }
}
