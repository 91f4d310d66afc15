use crate::{env::Action, state::State};

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Exp {
    /// The state of the environment before taking the action
    pub state: State,
    /// The action taken in the given state
    pub action: Action,
    /// The state sensed again after the action was applied
    pub next_state: State,
    /// The reward received after taking the action
    pub reward: f64,
}
