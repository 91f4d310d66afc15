use std::str::FromStr;

use strum::{AsRefStr, Display, EnumCount, EnumString, VariantArray};

use crate::error::{Error, Result};

mod scripted;

pub use scripted::{Observation, ScriptedEnv};

/// Traffic light color at the intersection the cab is waiting at
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Light {
    Red,
    Green,
}

/// Direction another car at the intersection is heading
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Heading {
    Forward,
    Left,
    Right,
}

/// An action the cab can take, which doubles as the route planner's next waypoint
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumCount,
    VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Stay put
    #[strum(to_string = "none")]
    Idle = 0,
    Forward = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Position of the action in [`Action::VARIANTS`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// What the cab senses at its current intersection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inputs {
    pub light: Light,
    pub oncoming: Option<Heading>,
    pub left: Option<Heading>,
    pub right: Option<Heading>,
}

impl Inputs {
    /// Parse sensed inputs from their textual form, where `"none"` or an empty
    /// string marks an empty lane
    ///
    /// **Errors** with [`Error::Domain`] on any unrecognized value
    pub fn parse(light: &str, oncoming: &str, left: &str, right: &str) -> Result<Self> {
        Ok(Self {
            light: Light::from_str(light).map_err(|_| Error::domain("light", light))?,
            oncoming: parse_heading("oncoming", oncoming)?,
            left: parse_heading("left", left)?,
            right: parse_heading("right", right)?,
        })
    }
}

fn parse_heading(lane: &str, value: &str) -> Result<Option<Heading>> {
    match value {
        "" | "none" => Ok(None),
        _ => Heading::from_str(value)
            .map(Some)
            .map_err(|_| Error::domain(lane, value)),
    }
}

/// The world the cab drives in, together with its route planner
///
/// Everything about positions, traffic and deadlines lives behind this trait. The
/// agent only senses, acts and asks for a new route at the start of each trial.
pub trait Environment {
    /// Where a trip can be routed to
    type Location;

    /// Sense the intersection the cab is currently at
    fn sense(&self) -> Inputs;

    /// The direction the route planner wants the cab to head next
    fn next_waypoint(&self) -> Action;

    /// Steps left before the trip is late. Informational only
    fn deadline(&self) -> i32;

    /// Apply an action to the world
    ///
    /// **Returns** the reward for taking it
    fn act(&mut self, action: Action) -> f64;

    /// Plan a route to `destination`, or to one of the environment's choosing
    fn route_to(&mut self, destination: Option<Self::Location>);

    /// Determine if the current trial is still running
    fn is_active(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod tests {
    use test_case::test_case;

    use super::*;

    /// Environment that always senses the same intersection and pays a fixed reward
    /// per action
    pub struct MockEnv {
        pub inputs: Inputs,
        pub waypoint: Action,
        pub steps: u32,
        pub limit: u32,
        pub routes: u32,
    }

    impl MockEnv {
        pub fn new(limit: u32) -> Self {
            Self {
                inputs: Inputs {
                    light: Light::Green,
                    oncoming: None,
                    left: None,
                    right: None,
                },
                waypoint: Action::Forward,
                steps: 0,
                limit,
                routes: 0,
            }
        }
    }

    impl Environment for MockEnv {
        type Location = ();

        fn sense(&self) -> Inputs {
            self.inputs
        }

        fn next_waypoint(&self) -> Action {
            self.waypoint
        }

        fn deadline(&self) -> i32 {
            self.limit as i32 - self.steps as i32
        }

        fn act(&mut self, action: Action) -> f64 {
            self.steps += 1;
            if action == self.waypoint {
                2.0
            } else {
                -0.5
            }
        }

        fn route_to(&mut self, _destination: Option<()>) {
            self.steps = 0;
            self.routes += 1;
        }

        fn is_active(&self) -> bool {
            self.steps < self.limit
        }
    }

    #[test]
    fn action_strings() {
        assert_eq!(Action::Idle.to_string(), "none");
        assert_eq!(Action::from_str("forward").unwrap(), Action::Forward);
        assert_eq!(Action::from_str("none").unwrap(), Action::Idle);
        assert!(Action::from_str("backward").is_err());
    }

    #[test]
    fn action_indices_follow_variant_order() {
        for (i, action) in Action::VARIANTS.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
        assert_eq!(Action::COUNT, 4);
    }

    #[test_case("red", "none", "", "left"; "empty lanes")]
    #[test_case("green", "forward", "right", "none"; "busy intersection")]
    fn inputs_parse(light: &str, oncoming: &str, left: &str, right: &str) {
        let inputs = Inputs::parse(light, oncoming, left, right).unwrap();
        assert_eq!(inputs.light.as_ref(), light);
        assert_eq!(
            inputs.oncoming.map(|h| h.to_string()),
            (!matches!(oncoming, "" | "none")).then(|| oncoming.to_string())
        );
    }

    #[test]
    fn inputs_parse_rejects_unknown_values() {
        let err = Inputs::parse("amber", "none", "none", "none").unwrap_err();
        assert!(matches!(err, Error::Domain { ref dimension, .. } if dimension == "light"));

        let err = Inputs::parse("red", "reverse", "none", "none").unwrap_err();
        assert!(matches!(err, Error::Domain { ref value, .. } if value == "reverse"));
    }
}
