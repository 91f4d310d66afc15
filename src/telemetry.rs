//! Per-step records kept for analysing trials after the fact

use std::io;

use crate::{
    env::Action,
    error::{Error, Result},
};

/// What happened on one time step of a trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub trial: u32,
    pub t: u32,
    pub deadline: i32,
    pub action: Action,
    pub reward: f64,
}

/// Reward statistics of one trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub steps: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Every step the agent has taken, in order
#[derive(Debug, Clone, Default)]
pub struct Review {
    records: Vec<Record>,
}

impl Review {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records belonging to `trial`
    pub fn trial(&self, trial: u32) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.trial == trial)
    }

    /// Reward statistics for `trial`, or `None` if it has no records
    pub fn summary(&self, trial: u32) -> Option<Summary> {
        let (steps, total, min, max) = self.trial(trial).fold(
            (0, 0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(n, total, min, max), r| (n + 1, total + r.reward, min.min(r.reward), max.max(r.reward)),
        );
        (steps > 0).then(|| Summary {
            steps,
            total,
            mean: total / steps as f64,
            min,
            max,
        })
    }

    /// Write every record as CSV with a `trial,t,deadline,action,reward` header
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["trial", "t", "deadline", "action", "reward"])?;
        for r in &self.records {
            wtr.write_record([
                r.trial.to_string(),
                r.t.to_string(),
                r.deadline.to_string(),
                r.action.to_string(),
                r.reward.to_string(),
            ])?;
        }
        wtr.flush().map_err(|source| Error::Io {
            operation: "flush review".to_string(),
            source,
        })
    }
}
