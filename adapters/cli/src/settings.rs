use std::{fs, path::Path};

use anyhow::{Context, Result};
use drone_courier_system_mission::MissionTuning;
use drone_courier_system_search::{IterativeDeepeningTuning, SearchTuning, Tuning};
use serde::Deserialize;

/// Tuning file contents; absent tables keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) search: SearchTuning,
    pub(crate) iterative_deepening: IterativeDeepeningTuning,
    pub(crate) mission: MissionTuning,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse tuning file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid tuning toml")
    }

    pub(crate) fn tuning(&self) -> Tuning {
        Tuning {
            search: self.search.clone(),
            iterative_deepening: self.iterative_deepening.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::parse(
            r#"
            [mission]
            diagnose_inbound = false

            [iterative_deepening]
            node_budget = 1000
            "#,
        )
        .expect("valid settings");

        assert!(!settings.mission.diagnose_inbound);
        assert_eq!(settings.iterative_deepening.node_budget, 1000);
        assert_eq!(settings.iterative_deepening.default_depth_limit, 32);
        assert_eq!(settings.search, SearchTuning::default());
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(Settings::parse("[render]\nscale = 2").is_err());
    }
}
