use drone_courier_core::{FlightConfig, FlightHeight, PowerMode, WeatherConditions};
use drone_courier_system_analytics::{compare, mission_breakdown, PathStatistics};
use drone_courier_system_mission::plan_complete_mission;
use drone_courier_system_search::{StrategyKind, Tuning};
use drone_courier_world::{Environment, Grid, MissionConfig};

const MAP: &[&[&str]] = &[
    &["S", "0", "0", "0", "0"],
    &["0", "X", "X", "X", "0"],
    &["0", "0", "0", "X", "0"],
    &["X", "X", "0", "0", "4"],
];

fn environment(flight: FlightConfig) -> Environment {
    let grid = Grid::parse(MAP).expect("valid grid");
    let start = grid.start().expect("start marker");
    let goal = grid.delivery_points()[0].1;
    Environment::new(
        grid,
        WeatherConditions::calm(),
        MissionConfig::new(start, goal).with_flight(flight),
    )
}

#[test]
fn breakdown_accounts_for_every_frame() {
    let env = environment(FlightConfig::default());
    let tuning = Tuning::default();

    for kind in StrategyKind::ALL {
        let strategy = kind.build(&tuning);
        let plan = plan_complete_mission(strategy.as_ref(), &env).expect("mission");
        let breakdown = mission_breakdown(&plan);

        assert_eq!(breakdown.total(), plan.len(), "{kind}");
        assert_eq!(breakdown.delivery, 3);
        assert_eq!(breakdown.rest, 5);
        assert_eq!(breakdown.outbound, plan.outbound.path.len() - 1);
    }
}

#[test]
fn comparison_covers_all_strategies() {
    let flight = FlightConfig::new(FlightHeight::High, PowerMode::Normal);
    let env = environment(flight);
    let tuning = Tuning::default();

    let results: Vec<_> = StrategyKind::ALL
        .into_iter()
        .map(|kind| {
            let strategy = kind.build(&tuning);
            let plan = plan_complete_mission(strategy.as_ref(), &env).expect("mission");
            PathStatistics::from_leg(plan.strategy, &plan.outbound, flight)
        })
        .collect();

    let comparison = compare(&results);
    let shortest = comparison.best_by_length.expect("results exist");
    assert!(results
        .iter()
        .all(|statistics| statistics.path_length >= shortest.path_length));
    assert_eq!(shortest.strategy, "best-first");
    assert!(comparison.best_by_time.is_some());
    assert_eq!(
        comparison.best_by_efficiency.map(|s| s.strategy),
        Some("best-first")
    );

    for statistics in &results {
        assert_eq!(statistics.straight_line_distance, 7);
        assert_eq!(statistics.path_length, 8);
    }
}

#[test]
fn mission_statistics_sum_both_legs() {
    let flight = FlightConfig::default();
    let env = environment(flight);
    let strategy = StrategyKind::UniformCost.build(&Tuning::default());
    let plan = plan_complete_mission(strategy.as_ref(), &env).expect("mission");
    let statistics = PathStatistics::from_mission(&plan, flight);

    assert_eq!(statistics.path_length, plan.len());
    assert_eq!(statistics.nodes_expanded, plan.nodes_expanded());
    assert!((statistics.realized_cost - plan.total_cost()).abs() < f64::EPSILON);
    assert_eq!(statistics.straight_line_distance, 1);
}
