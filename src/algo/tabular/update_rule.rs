use serde::Deserialize;

use crate::util::round_to;

/// Decimal places kept in the Q-table after every update
pub const PRECISION: i32 = 5;

/// How a one-step temporal-difference target is folded into the stored value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Q(s,a) ← Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a') - Q(s,a))
    #[default]
    QLearning,
    /// Q(s,a) ← α (r + γ max<sub>a'</sub> Q(s',a'))
    ///
    /// Throws the previous estimate away instead of blending it. Only kept to
    /// reproduce runs made with the three-dimension agent.
    Legacy,
}

impl UpdateRule {
    /// Compute the new value of an entry currently holding `q`
    ///
    /// The result is rounded to [`PRECISION`] decimal places.
    pub fn apply(self, q: f64, reward: f64, max_next_q: f64, alpha: f64, gamma: f64) -> f64 {
        let target = reward + gamma * max_next_q;
        let value = match self {
            Self::QLearning => q + alpha * (target - q),
            Self::Legacy => alpha * target,
        };
        round_to(value, PRECISION)
    }
}
