#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans drone delivery missions from CSV maps.

mod map;
mod settings;

use std::{collections::HashSet, path::PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use drone_courier_core::{CellCoord, FlightConfig, FlightHeight, PowerMode, WeatherConditions};
use drone_courier_system_analytics::{compare, mission_breakdown, PathStatistics};
use drone_courier_system_mission::{MissionPlan, MissionPlanner, MissionReplay};
use drone_courier_system_search::{
    BestFirst, ScaledManhattanHeuristic, SearchStrategy, StrategyKind, Tuning,
};
use drone_courier_world::{query, Environment, MissionConfig};
use log::info;

use crate::{map::MapSummary, settings::Settings};

#[derive(Parser, Debug)]
#[command(
    name = "drone-courier",
    version,
    about = "Plans a delivery round trip for a battery-limited drone"
)]
struct Cli {
    /// Headerless CSV map; one record per grid row
    #[arg(long)]
    map: PathBuf,

    /// Delivery point to serve (defaults to the first one on the map)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    destination: Option<u8>,

    /// Flight altitude
    #[arg(long, value_enum, default_value_t = HeightArg::Low)]
    height: HeightArg,

    /// Power mode
    #[arg(long, value_enum, default_value_t = PowerArg::Normal)]
    power: PowerArg,

    /// Wind intensity in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    wind: f64,

    /// Seed for the weather overlay
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Battery level at launch
    #[arg(long, default_value_t = 100.0)]
    battery: f64,

    /// Battery capacity
    #[arg(long, default_value_t = 100.0)]
    max_battery: f64,

    /// Search strategy, or `all` to compare every strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::BestFirst)]
    strategy: StrategyArg,

    /// Scale the best-first heuristic by the cheapest move cost
    #[arg(long, default_value_t = false)]
    scaled_heuristic: bool,

    /// TOML tuning file with [search], [iterative_deepening] and [mission] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the weather-overlaid map with the planned path marked
    #[arg(long, default_value_t = false)]
    render: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeightArg {
    Low,
    High,
}

impl From<HeightArg> for FlightHeight {
    fn from(value: HeightArg) -> Self {
        match value {
            HeightArg::Low => FlightHeight::Low,
            HeightArg::High => FlightHeight::High,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PowerArg {
    Normal,
    Saver,
}

impl From<PowerArg> for PowerMode {
    fn from(value: PowerArg) -> Self {
        match value {
            PowerArg::Normal => PowerMode::Normal,
            PowerArg::Saver => PowerMode::BatterySaver,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    BestFirst,
    UniformCost,
    IterativeDeepening,
    All,
}

impl StrategyArg {
    fn kinds(self) -> Vec<StrategyKind> {
        match self {
            Self::BestFirst => vec![StrategyKind::BestFirst],
            Self::UniformCost => vec![StrategyKind::UniformCost],
            Self::IterativeDeepening => vec![StrategyKind::IterativeDeepening],
            Self::All => StrategyKind::ALL.to_vec(),
        }
    }
}

/// Entry point for the drone courier command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let tuning = settings.tuning();

    let grid = map::load_map(&cli.map)?;
    let summary = map::inspect(&grid)?;
    print_summary(&summary);

    let goal = summary.destination(cli.destination)?;
    let flight = FlightConfig::new(cli.height.into(), cli.power.into());
    let weather = WeatherConditions::new(cli.wind, cli.seed);
    let config = MissionConfig::new(summary.start, goal)
        .with_flight(flight)
        .with_battery(cli.battery)
        .with_max_battery(cli.max_battery);

    info!(
        "mission {} -> {goal}, {:?} altitude, {:?} power, wind {:.2}",
        summary.start, flight.height, flight.power, weather.wind_intensity
    );

    let mut statistics = Vec::new();
    for kind in cli.strategy.kinds() {
        let strategy = build_strategy(kind, &tuning, cli.scaled_heuristic);
        let environment = Environment::new(grid.clone(), weather, config);

        match MissionPlanner::new(strategy.as_ref(), &settings.mission).plan(&environment) {
            Ok(plan) => {
                print_plan(&plan, &environment, cli.render);
                statistics.push(PathStatistics::from_mission(&plan, flight));
            }
            Err(error) => println!("{kind}: mission failed: {error}"),
        }
    }

    if statistics.len() > 1 {
        print_comparison(&statistics);
    }

    Ok(())
}

fn build_strategy(kind: StrategyKind, tuning: &Tuning, scaled: bool) -> Box<dyn SearchStrategy> {
    if scaled && kind == StrategyKind::BestFirst {
        Box::new(BestFirst::new(
            ScaledManhattanHeuristic,
            tuning.search.clone(),
        ))
    } else {
        kind.build(tuning)
    }
}

fn print_summary(summary: &MapSummary) {
    println!(
        "map {}x{}: start {}, {} destination(s), {} obstacle(s), {} elevated, {} charger(s), {} free",
        summary.width,
        summary.height,
        summary.start,
        summary.destinations.len(),
        summary.obstacles,
        summary.elevated,
        summary.charging_stations,
        summary.free
    );
}

fn print_plan(plan: &MissionPlan, environment: &Environment, render: bool) {
    let breakdown = mission_breakdown(plan);
    println!(
        "{}: mission planned, {} frames (out {}, deliver {}, back {}, rest {}), cost {:.2}, {} nodes, {:?}",
        plan.strategy,
        plan.len(),
        breakdown.outbound,
        breakdown.delivery,
        breakdown.inbound,
        breakdown.rest,
        plan.total_cost(),
        plan.nodes_expanded(),
        plan.elapsed()
    );

    let mut replay = MissionReplay::new(environment.clone(), plan);
    let frames = replay.run();
    let final_battery = frames.last().map_or(replay.battery(), |frame| frame.battery);
    println!(
        "  replay: {:?} after {} moves, battery {:.2}, {} wind cell(s) at intensity {:.2}",
        replay.status(),
        replay.distance_traveled(),
        final_battery,
        query::wind_cells(environment).len(),
        environment.terrain().weather().wind_intensity
    );

    if render {
        render_path(environment, &plan.path);
    }
}

fn render_path(environment: &Environment, path: &[CellCoord]) {
    let visited: HashSet<CellCoord> = path.iter().copied().collect();

    for (row, symbols) in query::overlay_symbols(environment).iter().enumerate() {
        let line: Vec<&str> = symbols
            .iter()
            .enumerate()
            .map(|(column, &symbol)| {
                let cell = CellCoord::new(column as u32, row as u32);
                let landmark = environment.is_home_base(cell) || environment.is_delivery_point(cell);
                if !landmark && visited.contains(&cell) {
                    "*"
                } else {
                    symbol
                }
            })
            .collect();
        println!("  {}", line.join(" "));
    }
}

fn print_comparison(statistics: &[PathStatistics]) {
    for entry in statistics {
        println!(
            "  {}: length {}, turns {}, efficiency {:.2}, est. battery {:.1}, est. time {:.1}s",
            entry.strategy,
            entry.path_length,
            entry.turns,
            entry.efficiency_ratio,
            entry.estimated_battery,
            entry.estimated_time
        );
    }

    let comparison = compare(statistics);
    if let Some(best) = comparison.best_by_length {
        println!("shortest: {} ({} frames)", best.strategy, best.path_length);
    }
    if let Some(best) = comparison.best_by_time {
        println!("fastest: {} ({:?})", best.strategy, best.computation_time);
    }
    if let Some(best) = comparison.best_by_efficiency {
        println!(
            "most efficient: {} (ratio {:.2})",
            best.strategy, best.efficiency_ratio
        );
    }
}
