//! File-based agent configuration

use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

use crate::{
    algo::{tabular::UpdateRule, QTableAgentConfig},
    decay::{Schedule, ScheduleSpec},
    error::{Error, Result},
    exploration::EpsilonGreedy,
    state::Dimension,
};

/// Agent settings as read from a configuration file
///
/// Every field is optional and falls back to the same defaults as
/// [`QTableAgentConfig`]. A TOML file looks like
///
/// ```toml
/// alpha = 0.8
/// gamma = 0.2
/// dimensions = ["light", "waypoint", "oncoming", "left"]
/// update_rule = "q_learning"
/// seed = 7
///
/// [exploration]
/// kind = "geometric"
/// start = 0.8
/// decay = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub alpha: f64,
    pub gamma: f64,
    pub exploration: ScheduleSpec,
    pub dimensions: Vec<Dimension>,
    pub update_rule: UpdateRule,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alpha: 0.8,
            gamma: 0.2,
            exploration: ScheduleSpec::Geometric {
                start: 0.8,
                decay: 0.1,
            },
            dimensions: vec![
                Dimension::Light,
                Dimension::Waypoint,
                Dimension::Oncoming,
                Dimension::Left,
            ],
            update_rule: UpdateRule::QLearning,
            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a configuration file, with the format picked by its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::from_config_file(path).map_err(|e| {
            Error::config(format!("unable to read {}: {e}", path.display()))
        })
    }

    /// Validate the settings and turn them into an agent configuration
    pub fn agent_config(&self) -> Result<QTableAgentConfig<Schedule>> {
        Ok(QTableAgentConfig {
            exploration: EpsilonGreedy::new(self.exploration.build()?),
            alpha: self.alpha,
            gamma: self.gamma,
            dimensions: self.dimensions.clone(),
            update_rule: self.update_rule,
            seed: self.seed,
        })
    }
}
