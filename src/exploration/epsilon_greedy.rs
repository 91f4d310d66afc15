use rand::{seq::SliceRandom, Rng};
use strum::VariantArray;

use crate::{algo::tabular::Row, decay::Decay, env::Action};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate for `episode`, clamped to `[0,1]`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64).clamp(0.0, 1.0)
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        Choice::draw(self.epsilon(episode), rng)
    }

    /// Pick an action for a state with the given row of values
    pub fn select<R: Rng + ?Sized>(&self, episode: u32, row: &Row, rng: &mut R) -> Action {
        resolve(self.choose(episode, rng), row, rng)
    }
}

/// Pick an action at exploration rate `epsilon`
///
/// Exploring draws uniformly from every action. Exploiting draws uniformly from
/// the actions whose value equals the row maximum exactly.
pub fn select<R: Rng + ?Sized>(epsilon: f64, row: &Row, rng: &mut R) -> Action {
    resolve(Choice::draw(epsilon, rng), row, rng)
}

fn resolve<R: Rng + ?Sized>(choice: Choice, row: &Row, rng: &mut R) -> Action {
    match choice {
        Choice::Explore => random_action(rng),
        Choice::Exploit => match row.best_actions().choose(rng) {
            Some(&action) => action,
            // only reachable if every value is NaN
            None => random_action(rng),
        },
    }
}

/// An action drawn uniformly from the full action set
pub fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    *Action::VARIANTS
        .choose(rng)
        .expect("There is always at least one action available")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};
    use statrs::{
        distribution::{Binomial, ChiSquared, ContinuousCDF},
        statistics::Distribution,
    };

    use super::*;
    use crate::decay;

    const DRAWS: u64 = 20_000;

    fn counts(epsilon: f64, row: &Row, rng: &mut StdRng) -> HashMap<Action, u64> {
        let mut counts = HashMap::new();
        for _ in 0..DRAWS {
            *counts.entry(select(epsilon, row, rng)).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn always_returns_a_valid_action() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let mut row = Row::default();
            for &action in Action::VARIANTS {
                row.set(action, rng.gen_range(-2.0..2.0));
            }
            let epsilon = (i % 11) as f64 / 10.0;
            let action = select(epsilon.min(1.0), &row, &mut rng);
            assert!(Action::VARIANTS.contains(&action));
        }
    }

    #[test]
    fn full_exploration_is_uniform() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut row = Row::default();
        row.set(Action::Forward, 5.0);
        let counts = counts(1.0, &row, &mut rng);

        let expected = DRAWS as f64 / Action::VARIANTS.len() as f64;
        let statistic: f64 = Action::VARIANTS
            .iter()
            .map(|a| {
                let observed = *counts.get(a).unwrap_or(&0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();
        let critical = ChiSquared::new((Action::VARIANTS.len() - 1) as f64)
            .unwrap()
            .inverse_cdf(0.9999);
        assert!(
            statistic < critical,
            "chi-squared {statistic} exceeds {critical}: {counts:?}"
        );
    }

    #[test]
    fn greedy_picks_unique_maximum() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut row = Row::default();
        row.set(Action::Left, 0.7);
        row.set(Action::Right, 0.69999);
        for _ in 0..1000 {
            assert_eq!(select(0.0, &row, &mut rng), Action::Left);
        }
    }

    #[test]
    fn greedy_breaks_ties_fairly() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut row = Row::default();
        row.set(Action::Idle, -1.0);
        row.set(Action::Forward, 0.4);
        row.set(Action::Right, 0.4);
        let counts = counts(0.0, &row, &mut rng);

        assert_eq!(counts.len(), 2, "Only tied actions are chosen: {counts:?}");
        let binomial = Binomial::new(0.5, DRAWS).unwrap();
        let (mean, sd) = (binomial.mean().unwrap(), binomial.std_dev().unwrap());
        for action in [Action::Forward, Action::Right] {
            let observed = counts[&action] as f64;
            assert!(
                (observed - mean).abs() < 5.0 * sd,
                "{action} chosen {observed} times, expected about {mean}"
            );
        }
    }

    #[test]
    fn epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(decay::Geometric::new(0.8, 0.1).unwrap());
        assert_eq!(policy.epsilon(0), 0.8);
        let mut previous = policy.epsilon(0);
        for episode in 1..50 {
            let epsilon = policy.epsilon(episode);
            assert!(epsilon < previous && epsilon >= 0.0);
            previous = epsilon;
        }

        let policy = EpsilonGreedy::new(decay::Constant::new(1.5));
        assert_eq!(policy.epsilon(3), 1.0, "Epsilon is clamped");
    }

    #[test]
    fn choose_never_explores_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let policy = EpsilonGreedy::new(decay::Constant::new(0.0));
        for _ in 0..1000 {
            assert!(matches!(policy.choose(0, &mut rng), Choice::Exploit));
        }
    }

    #[test]
    fn policy_select_follows_its_schedule() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut row = Row::default();
        row.set(Action::Right, 1.0);

        let greedy = EpsilonGreedy::new(decay::Constant::new(0.0));
        for episode in 0..200 {
            assert_eq!(greedy.select(episode, &row, &mut rng), Action::Right);
        }

        let explorer = EpsilonGreedy::new(decay::Constant::new(1.0));
        let picked: std::collections::HashSet<Action> = (0..200)
            .map(|episode| explorer.select(episode, &row, &mut rng))
            .collect();
        assert_eq!(picked.len(), Action::VARIANTS.len());
    }
}
