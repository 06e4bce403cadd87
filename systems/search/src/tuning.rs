//! Tunable search parameters loaded from configuration files.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_BATTERY_RESOLUTION: f64 = 0.01;
const DEFAULT_DEPTH_LIMIT: u32 = 32;
const DEFAULT_TIME_BUDGET_MS: u64 = 30_000;
const DEFAULT_NODE_BUDGET: usize = 100_000;

/// Tuning for the frontier-based strategies.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchTuning {
    /// Battery levels closer than this are treated as the same state.
    pub battery_resolution: f64,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            battery_resolution: DEFAULT_BATTERY_RESOLUTION,
        }
    }
}

impl SearchTuning {
    /// Quantized battery level used as part of the closed-set key.
    #[must_use]
    pub fn battery_units(&self, battery: f64) -> i64 {
        let resolution = if self.battery_resolution > 0.0 {
            self.battery_resolution
        } else {
            DEFAULT_BATTERY_RESOLUTION
        };
        (battery / resolution).round() as i64
    }
}

/// Depth limit applied to grids that fit within the given dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DepthTier {
    /// Largest row count covered by the tier.
    pub max_rows: u32,
    /// Largest column count covered by the tier.
    pub max_cols: u32,
    /// Deepest iteration attempted.
    pub depth_limit: u32,
}

/// Budgets for iterative-deepening search.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IterativeDeepeningTuning {
    /// Size tiers, checked in order; the first one that fits wins.
    pub tiers: Vec<DepthTier>,
    /// Depth limit for grids larger than every tier.
    pub default_depth_limit: u32,
    /// Wall-clock budget in milliseconds.
    pub time_budget_ms: u64,
    /// Maximum number of expanded nodes across all iterations.
    pub node_budget: usize,
}

impl Default for IterativeDeepeningTuning {
    fn default() -> Self {
        Self {
            tiers: vec![
                DepthTier {
                    max_rows: 8,
                    max_cols: 8,
                    depth_limit: 64,
                },
                DepthTier {
                    max_rows: 16,
                    max_cols: 16,
                    depth_limit: 48,
                },
                DepthTier {
                    max_rows: 32,
                    max_cols: 32,
                    depth_limit: 40,
                },
            ],
            default_depth_limit: DEFAULT_DEPTH_LIMIT,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }
}

impl IterativeDeepeningTuning {
    /// Depth limit for a grid of `(columns, rows)`.
    #[must_use]
    pub fn depth_limit_for(&self, (columns, rows): (u32, u32)) -> u32 {
        self.tiers
            .iter()
            .find(|tier| rows <= tier.max_rows && columns <= tier.max_cols)
            .map_or(self.default_depth_limit, |tier| tier.depth_limit)
    }

    /// Wall-clock budget.
    #[must_use]
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}
