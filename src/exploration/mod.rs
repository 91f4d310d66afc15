use rand::Rng;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

impl Choice {
    /// Explore with probability `epsilon`
    pub fn draw<R: Rng + ?Sized>(epsilon: f64, rng: &mut R) -> Self {
        if rng.gen::<f64>() < epsilon {
            Self::Explore
        } else {
            Self::Exploit
        }
    }
}

mod epsilon_greedy;

pub use epsilon_greedy::{random_action, select, EpsilonGreedy};
