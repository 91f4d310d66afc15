use log::{debug, info, trace, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::{Action, Environment},
    error::{Error, Result},
    experience::Exp,
    exploration::EpsilonGreedy,
    state::{Dimension, State, StateSpace},
    telemetry::{Record, Review},
};

use super::{QTable, UpdateRule};

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<D: Decay> {
    /// Exploration rate schedule, evaluated at the current trial number
    ///
    /// **Default**: geometric, starting at `0.8` and shrinking by `10%` per trial
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate
    ///
    /// **Default**: `0.8`
    pub alpha: f64,
    /// Discount factor
    ///
    /// **Default**: `0.2`
    pub gamma: f64,
    /// Dimensions of the state, in order
    ///
    /// **Default**: light, waypoint, oncoming, left
    pub dimensions: Vec<Dimension>,
    /// **Default**: [`UpdateRule::QLearning`]
    pub update_rule: UpdateRule,
    /// Seed for the agent's random number generator, or `None` to seed from entropy
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig<decay::Geometric> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Geometric::new(0.8, 0.1).expect("default schedule is in range"),
            ),
            alpha: 0.8,
            gamma: 0.2,
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

/// A Q-learning agent that drives a smartcab using a fully enumerated Q-table
///
/// The agent owns its table, its random number generator and its review of past
/// steps. Environments are only borrowed for the duration of a call.
#[derive(Debug, Clone)]
pub struct QTableAgent<D: Decay> {
    table: QTable,
    exploration: EpsilonGreedy<D>,
    alpha: f64,   // learning rate
    gamma: f64,   // discount factor
    rule: UpdateRule,
    episode: u32, // current trial
    rng: StdRng,
    review: Review,
}

impl<D: Decay> QTableAgent<D> {
    /// Initialize a new `QTableAgent`
    ///
    /// **Errors** if `alpha` or `gamma` is not in the interval `[0,1]`, or if the
    /// dimensions do not describe a valid state space
    pub fn new(config: QTableAgentConfig<D>) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            dimensions,
            update_rule,
            seed,
        } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);

        let space = StateSpace::new(dimensions)?;
        info!(
            "built Q-table over {} states ({}), update rule {:?}",
            space.len(),
            space
                .dimensions()
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            update_rule
        );

        Ok(Self {
            table: QTable::new(space),
            exploration,
            alpha,
            gamma,
            rule: update_rule,
            episode: 0,
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            review: Review::new(),
        })
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Replace the table with one over the same state space
    ///
    /// Apart from learning, this is the only way to change the agent's values. It is
    /// meant for restoring a saved table or starting from seeded values.
    ///
    /// **Errors** if `table` is built over different dimensions
    pub fn set_table(&mut self, table: QTable) -> Result<()> {
        if table.space().dimensions() != self.table.space().dimensions() {
            return Err(Error::config(
                "replacement table is built over different dimensions",
            ));
        }
        self.table = table;
        Ok(())
    }

    pub fn review(&self) -> &Review {
        &self.review
    }

    /// Number of trials started so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Exploration rate of the current trial
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.episode)
    }

    /// Choose an action for `state` with the current exploration rate
    ///
    /// **Errors** if `state` does not fit the agent's state space
    pub fn act(&mut self, state: &State) -> Result<Action> {
        self.table.space().validate(state)?;
        let row = self.table.get_all(state)?;
        Ok(self.exploration.select(self.episode, row, &mut self.rng))
    }

    /// Update the table entry for the experience's (state, action) pair
    ///
    /// **Returns** the new value
    ///
    /// **Errors** with [`Error::Domain`] if the reward is not finite, leaving the table
    /// untouched
    pub fn learn(&mut self, experience: Exp) -> Result<f64> {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;
        if !reward.is_finite() {
            return Err(Error::domain("reward", reward.to_string()));
        }

        let q_value = self.table.get(&state, action)?;
        let max_next_q = self.table.get_all(&next_state)?.max();
        let new_q_value = self
            .rule
            .apply(q_value, reward, max_next_q, self.alpha, self.gamma);

        trace!("Q{state}[{action}]: {q_value} -> {new_q_value}");
        self.table.set(&state, action, new_q_value)?;
        Ok(new_q_value)
    }

    /// Start a new trial: plan a route and decay the exploration rate
    pub fn reset<E: Environment>(&mut self, env: &mut E, destination: Option<E::Location>) {
        env.route_to(destination);

        if self.episode > 0 {
            match self.review.summary(self.episode) {
                Some(s) => info!(
                    "trial {} finished after {} steps: total {:.2}, mean {:.3}, min {}, max {}",
                    self.episode, s.steps, s.total, s.mean, s.min, s.max
                ),
                None => warn!("trial {} finished without taking a step", self.episode),
            }
        }

        self.episode += 1;
        info!("trial {} started, epsilon = {:.5}", self.episode, self.epsilon());
    }

    /// Take one time step: sense, act, sense again and learn
    ///
    /// **Errors** if a sensed state falls outside the agent's state space. The
    /// table is left untouched in that case.
    pub fn update<E: Environment>(&mut self, env: &mut E, t: u32) -> Result<Record> {
        let waypoint = env.next_waypoint();
        let inputs = env.sense();
        let deadline = env.deadline();

        let state = self.table.space().project(&inputs, waypoint);
        let action = self.act(&state)?;
        let reward = env.act(action);

        let next_state = self
            .table
            .space()
            .project(&env.sense(), env.next_waypoint());
        self.table.space().validate(&next_state)?;

        self.learn(Exp {
            state,
            action,
            next_state,
            reward,
        })?;

        debug!(
            "t = {t}, deadline = {deadline}, inputs = {inputs:?}, waypoint = {waypoint}, action = {action}, reward = {reward}"
        );

        let record = Record {
            trial: self.episode,
            t,
            deadline,
            action,
            reward,
        };
        self.review.push(record);
        Ok(record)
    }

    /// Run one full trial in the given environment
    ///
    /// **Returns** the number of steps taken
    pub fn go<E: Environment>(&mut self, env: &mut E) -> Result<u32> {
        self.reset(env, None);
        let mut t = 0;
        while env.is_active() {
            self.update(env, t)?;
            t += 1;
        }
        Ok(t)
    }
}
