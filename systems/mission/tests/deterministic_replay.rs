use std::sync::Arc;

use drone_courier_core::{
    CellCode, CellCoord, FlightConfig, FlightHeight, PhaseEvent, PowerMode, WeatherConditions,
};
use drone_courier_system_mission::{
    plan_complete_mission, DroneStatus, MissionPlan, MissionReplay, ReplayFrame,
};
use drone_courier_system_search::{StrategyKind, Tuning};
use drone_courier_world::{query, Environment, Grid, MissionConfig, Terrain};

const MAP: &[&[&str]] = &[
    &["S", "0", "0", "0", "0", "0"],
    &["0", "X", "X", "0", "A", "0"],
    &["0", "0", "B", "0", "A", "0"],
    &["X", "0", "X", "0", "0", "0"],
    &["0", "0", "0", "0", "X", "3"],
];

#[derive(Debug, PartialEq)]
struct Outcome {
    wind: Vec<CellCoord>,
    plan: MissionPlanSnapshot,
    frames: Vec<ReplayFrame>,
}

#[derive(Debug, PartialEq)]
struct MissionPlanSnapshot {
    path: Vec<CellCoord>,
    outbound_nodes: usize,
    inbound_nodes: usize,
    total_cost: f64,
}

impl From<&MissionPlan> for MissionPlanSnapshot {
    fn from(plan: &MissionPlan) -> Self {
        Self {
            path: plan.path.clone(),
            outbound_nodes: plan.outbound.nodes_expanded,
            inbound_nodes: plan.inbound.nodes_expanded,
            total_cost: plan.total_cost(),
        }
    }
}

fn build_environment(seed: u64) -> Environment {
    let grid = Grid::parse(MAP).expect("valid grid");
    let start = grid.start().expect("start marker");
    let goal = grid.delivery_points()[0].1;
    Environment::new(
        grid,
        WeatherConditions::new(0.75, seed),
        MissionConfig::new(start, goal)
            .with_flight(FlightConfig::new(FlightHeight::High, PowerMode::Normal))
            .with_battery(12.0),
    )
}

fn run(kind: StrategyKind, seed: u64) -> Outcome {
    let env = build_environment(seed);
    let strategy = kind.build(&Tuning::default());
    let plan = plan_complete_mission(strategy.as_ref(), &env).expect("mission");
    let wind = query::wind_cells(&env);
    let frames = MissionReplay::new(env, &plan).run();

    Outcome {
        wind,
        plan: MissionPlanSnapshot::from(&plan),
        frames,
    }
}

#[test]
fn identical_seeds_replay_identically() {
    for kind in StrategyKind::ALL {
        let first = run(kind, 0x5eed);
        let second = run(kind, 0x5eed);
        assert_eq!(first, second, "{kind} replay diverged");
    }
}

#[test]
fn replay_trace_ends_in_completion() {
    for kind in StrategyKind::ALL {
        let outcome = run(kind, 42);
        let last = outcome.frames.last().expect("non-empty trace");

        assert_eq!(last.event, Some(PhaseEvent::MissionCompleted), "{kind}");
        assert_eq!(last.status, DroneStatus::Completed);
        assert!((last.battery - 100.0).abs() < f64::EPSILON);
        assert_eq!(outcome.frames.len(), outcome.plan.path.len());
    }
}

#[test]
fn wind_never_lands_on_marked_cells() {
    let env = build_environment(7);
    let original = env.terrain().original();

    for cell in query::wind_cells(&env) {
        assert_eq!(original.get(cell), Some(CellCode::Free));
        assert_eq!(env.classify(cell), Some(CellCode::Wind));
    }
}

#[test]
fn shared_terrain_plans_like_a_fresh_one() {
    let fresh = build_environment(9);
    let terrain = Arc::new(Terrain::clone(fresh.terrain()));
    let agent = fresh.agent();
    let shared = Environment::with_terrain(
        terrain,
        MissionConfig::new(agent.start(), agent.goal())
            .with_flight(fresh.flight())
            .with_battery(agent.battery()),
    );
    let strategy = StrategyKind::UniformCost.build(&Tuning::default());

    let a = plan_complete_mission(strategy.as_ref(), &fresh).expect("mission");
    let b = plan_complete_mission(strategy.as_ref(), &shared).expect("mission");
    assert_eq!(a.path, b.path);
}
