//! Discretized states and the enumeration of every state an agent can be in

use std::{collections::HashSet, fmt, str::FromStr};

use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{
    env::{Action, Heading, Inputs, Light},
    error::{Error, Result},
};

/// What another car is doing in one lane of the intersection
///
/// An empty lane is its own category, [`Traffic::Absent`], never a missing value.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Traffic {
    #[strum(to_string = "none")]
    Absent,
    Forward,
    Left,
    Right,
}

impl From<Option<Heading>> for Traffic {
    fn from(heading: Option<Heading>) -> Self {
        match heading {
            None => Self::Absent,
            Some(Heading::Forward) => Self::Forward,
            Some(Heading::Left) => Self::Left,
            Some(Heading::Right) => Self::Right,
        }
    }
}

/// One component of a [`State`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Light(Light),
    Waypoint(Action),
    Traffic(Traffic),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light(x) => fmt::Display::fmt(x, f),
            Self::Waypoint(x) => fmt::Display::fmt(x, f),
            Self::Traffic(x) => fmt::Display::fmt(x, f),
        }
    }
}

/// A sensed quantity that can be part of the state
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
    VariantArray,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Light,
    Waypoint,
    Oncoming,
    Left,
    Right,
}

impl Dimension {
    /// Every value this dimension can take, in declaration order
    pub fn domain(self) -> Vec<Feature> {
        match self {
            Self::Light => Light::VARIANTS.iter().copied().map(Feature::Light).collect(),
            Self::Waypoint => Action::VARIANTS
                .iter()
                .copied()
                .map(Feature::Waypoint)
                .collect(),
            Self::Oncoming | Self::Left | Self::Right => Traffic::VARIANTS
                .iter()
                .copied()
                .map(Feature::Traffic)
                .collect(),
        }
    }

    /// Read this dimension off the sensed inputs
    pub fn project(self, inputs: &Inputs, waypoint: Action) -> Feature {
        match self {
            Self::Light => Feature::Light(inputs.light),
            Self::Waypoint => Feature::Waypoint(waypoint),
            Self::Oncoming => Feature::Traffic(inputs.oncoming.into()),
            Self::Left => Feature::Traffic(inputs.left.into()),
            Self::Right => Feature::Traffic(inputs.right.into()),
        }
    }

    /// Parse a value of this dimension from its textual form
    pub fn parse(self, value: &str) -> Result<Feature> {
        let feature = match self {
            Self::Light => Light::from_str(value).map(Feature::Light),
            Self::Waypoint => Action::from_str(value).map(Feature::Waypoint),
            Self::Oncoming | Self::Left | Self::Right => {
                Traffic::from_str(value).map(Feature::Traffic)
            }
        };
        feature.map_err(|_| Error::domain(self.to_string(), value))
    }

    /// Whether `feature` belongs to this dimension's domain
    pub fn admits(self, feature: Feature) -> bool {
        matches!(
            (self, feature),
            (Self::Light, Feature::Light(_))
                | (Self::Waypoint, Feature::Waypoint(_))
                | (
                    Self::Oncoming | Self::Left | Self::Right,
                    Feature::Traffic(_)
                )
        )
    }
}

/// An ordered tuple of features, one per dimension of the [`StateSpace`] it came from
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State(Vec<Feature>);

impl State {
    pub fn new(features: Vec<Feature>) -> Self {
        Self(features)
    }

    pub fn features(&self) -> &[Feature] {
        &self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, feature) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{feature}")?;
        }
        write!(f, ")")
    }
}

/// Every tuple in the Cartesian product of `domains`, with the first domain varying slowest
pub fn cartesian_product<T: Clone>(domains: &[Vec<T>]) -> Vec<Vec<T>> {
    domains.iter().fold(vec![Vec::new()], |acc, domain| {
        acc.iter()
            .flat_map(|prefix| {
                domain.iter().map(move |value| {
                    let mut tuple = Vec::with_capacity(prefix.len() + 1);
                    tuple.extend_from_slice(prefix);
                    tuple.push(value.clone());
                    tuple
                })
            })
            .collect()
    })
}

/// The finite set of states for a chosen list of dimensions
#[derive(Clone, Debug)]
pub struct StateSpace {
    dimensions: Vec<Dimension>,
    states: Vec<State>,
}

impl StateSpace {
    /// Enumerate the state space spanned by `dimensions`
    ///
    /// **Errors** if `dimensions` is empty or names a dimension twice
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(Error::config("a state needs at least one dimension"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = dimensions.iter().find(|d| !seen.insert(**d)) {
            return Err(Error::config(format!("dimension `{dup}` is listed twice")));
        }

        let domains: Vec<Vec<Feature>> = dimensions.iter().map(|d| d.domain()).collect();
        let states = cartesian_product(&domains)
            .into_iter()
            .map(State)
            .collect();

        Ok(Self { dimensions, states })
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// All states, in enumeration order
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Build the state for the sensed inputs, dropping dimensions this space does not use
    pub fn project(&self, inputs: &Inputs, waypoint: Action) -> State {
        State(
            self.dimensions
                .iter()
                .map(|d| d.project(inputs, waypoint))
                .collect(),
        )
    }

    /// Parse a state from one string per dimension
    pub fn parse<S: AsRef<str>>(&self, values: &[S]) -> Result<State> {
        if values.len() != self.dimensions.len() {
            return Err(Error::domain(
                "state",
                values
                    .iter()
                    .map(|v| v.as_ref())
                    .collect::<Vec<_>>()
                    .join(","),
            ));
        }
        self.dimensions
            .iter()
            .zip(values)
            .map(|(d, v)| d.parse(v.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(State)
    }

    /// Check that every feature of `state` fits the matching dimension
    ///
    /// **Errors** with [`Error::Domain`] naming the first offending dimension
    pub fn validate(&self, state: &State) -> Result<()> {
        if state.0.len() != self.dimensions.len() {
            return Err(Error::domain("state", state.to_string()));
        }
        match self
            .dimensions
            .iter()
            .zip(&state.0)
            .find(|(d, f)| !d.admits(**f))
        {
            Some((d, f)) => Err(Error::domain(d.to_string(), f.to_string())),
            None => Ok(()),
        }
    }
}
