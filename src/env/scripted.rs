use std::{io, str::FromStr};

use crate::error::{Error, Result};

use super::{Action, Environment, Inputs};

/// What the cab sees at one point of a scripted trip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub inputs: Inputs,
    pub waypoint: Action,
}

/// An environment that replays a recorded trip
///
/// Holds `n` rewards and `n + 1` observations: observation `i` is what the cab
/// senses before step `i`, and the last one is what it senses after the final
/// step. Rewards are paid out in order no matter which action is taken.
#[derive(Clone, Debug)]
pub struct ScriptedEnv {
    observations: Vec<Observation>,
    rewards: Vec<f64>,
    cursor: usize,
}

impl ScriptedEnv {
    /// **Errors** unless there is exactly one more observation than rewards, or with
    /// [`Error::Domain`] if a reward is not finite
    pub fn new(observations: Vec<Observation>, rewards: Vec<f64>) -> Result<Self> {
        if let Some(reward) = rewards.iter().find(|r| !r.is_finite()) {
            return Err(Error::domain("reward", reward.to_string()));
        }
        if observations.len() != rewards.len() + 1 {
            return Err(Error::config(format!(
                "a script with {} rewards needs {} observations, got {}",
                rewards.len(),
                rewards.len() + 1,
                observations.len()
            )));
        }
        Ok(Self {
            observations,
            rewards,
            cursor: 0,
        })
    }

    /// Load a script from CSV with the columns `light,oncoming,left,right,waypoint,reward`
    ///
    /// The reward of the last row must be empty, every other row needs one.
    ///
    /// **Errors** with [`Error::Domain`] on an unknown light, heading or waypoint, or
    /// on a reward that is not a finite number
    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self> {
        const HEADER: [&str; 6] = ["light", "oncoming", "left", "right", "waypoint", "reward"];

        let mut rdr = csv::Reader::from_reader(reader);
        if rdr.headers()?.iter().ne(HEADER) {
            return Err(Error::config(format!(
                "script header must be `{}`",
                HEADER.join(",")
            )));
        }

        let mut observations = Vec::new();
        let mut rewards = Vec::new();
        let mut last_blank = false;
        for record in rdr.records() {
            let record = record?;
            if last_blank {
                return Err(Error::config("only the last script row may omit its reward"));
            }
            let inputs = Inputs::parse(&record[0], &record[1], &record[2], &record[3])?;
            let waypoint = Action::from_str(&record[4])
                .map_err(|_| Error::domain("waypoint", &record[4]))?;
            observations.push(Observation { inputs, waypoint });

            match record[5].trim() {
                "" => last_blank = true,
                reward => rewards.push(
                    reward
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| Error::domain("reward", reward))?,
                ),
            }
        }

        Self::new(observations, rewards)
    }

    fn current(&self) -> &Observation {
        &self.observations[self.cursor]
    }

    /// Number of steps in the script
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

impl Environment for ScriptedEnv {
    type Location = ();

    fn sense(&self) -> Inputs {
        self.current().inputs
    }

    fn next_waypoint(&self) -> Action {
        self.current().waypoint
    }

    fn deadline(&self) -> i32 {
        (self.rewards.len() - self.cursor) as i32
    }

    fn act(&mut self, _action: Action) -> f64 {
        match self.rewards.get(self.cursor) {
            Some(&reward) => {
                self.cursor += 1;
                reward
            }
            None => 0.0,
        }
    }

    fn route_to(&mut self, _destination: Option<()>) {
        self.cursor = 0;
    }

    fn is_active(&self) -> bool {
        self.cursor < self.rewards.len()
    }
}
