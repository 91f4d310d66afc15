use serde::Deserialize;

use crate::{ensure_interval, error::Error, error::Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;
}

/// A decaying value never rises: `rate` must be non-negative and `vi` at least `vf`
fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    (rate >= 0.0 && vi >= vf)
        .then_some(())
        .ok_or_else(|| Error::config("a decaying value needs `rate >= 0` and `vi >= vf`"))
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> f64 {
        self.value
    }
}

/// v(t) = v<sub>i</sub> * (1 - r)<sup>t</sup>
///
/// Equivalent to multiplying the value by `1 - r` once per time step, which is how
/// the exploration rate shrinks on every trial reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    vi: f64,
    rate: f64,
}

impl Geometric {
    /// **Errors** if `vi` is not in `[0,1]` or `rate` is not in `[0,1]`
    pub fn new(vi: f64, rate: f64) -> Result<Self> {
        ensure_interval!(vi, 0.0, 1.0);
        ensure_interval!(rate, 0.0, 1.0);
        Ok(Self { vi, rate })
    }
}

impl Decay for Geometric {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { vi, rate } = self;
        vi * (1.0 - rate).powf(t)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exponential {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Exponential {
    /// **Errors** if the value would rise over time
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    /// **Errors** if the value would rise over time
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }
}

/// Any of the schedules above, selected at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Constant(Constant),
    Geometric(Geometric),
    Exponential(Exponential),
    Linear(Linear),
}

impl Decay for Schedule {
    fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Constant(d) => d.evaluate(t),
            Self::Geometric(d) => d.evaluate(t),
            Self::Exponential(d) => d.evaluate(t),
            Self::Linear(d) => d.evaluate(t),
        }
    }
}

/// Serialized form of a [`Schedule`], validated by [`ScheduleSpec::build`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleSpec {
    Constant { value: f64 },
    Geometric { start: f64, decay: f64 },
    Exponential { rate: f64, start: f64, end: f64 },
    Linear { rate: f64, start: f64, end: f64 },
}

impl ScheduleSpec {
    pub fn build(&self) -> Result<Schedule> {
        Ok(match *self {
            Self::Constant { value } => {
                ensure_interval!(value, 0.0, 1.0);
                Schedule::Constant(Constant::new(value))
            }
            Self::Geometric { start, decay } => Schedule::Geometric(Geometric::new(start, decay)?),
            Self::Exponential { rate, start, end } => {
                Schedule::Exponential(Exponential::new(rate, start, end)?)
            }
            Self::Linear { rate, start, end } => Schedule::Linear(Linear::new(rate, start, end)?),
        })
    }
}
