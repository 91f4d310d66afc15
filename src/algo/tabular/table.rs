use std::{collections::HashMap, io, str::FromStr};

use strum::{EnumCount, VariantArray};

use crate::{
    env::Action,
    error::{Error, Result},
    state::{State, StateSpace},
};

/// The values of every action in one state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Row([f64; Action::COUNT]);

impl Row {
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    /// Iterate over `(action, value)` pairs in action order
    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::VARIANTS.iter().copied().zip(self.0.iter().copied())
    }

    /// The highest value in the row
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose value is exactly the row maximum
    pub fn best_actions(&self) -> Vec<Action> {
        let max = self.max();
        self.iter()
            .filter(|&(_, value)| value == max)
            .map(|(action, _)| action)
            .collect()
    }
}

/// A Q-table holding a value for every (state, action) pair of a [`StateSpace`]
///
/// All rows are created up front and initialized to zero, so a lookup only fails
/// when the state was never part of the space.
#[derive(Debug, Clone)]
pub struct QTable {
    space: StateSpace,
    rows: HashMap<State, Row>,
}

impl QTable {
    /// Build a zeroed table covering `space`
    pub fn new(space: StateSpace) -> Self {
        let rows = space
            .states()
            .iter()
            .map(|s| (s.clone(), Row::default()))
            .collect();
        Self { space, rows }
    }

    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// Number of (state, action) entries
    pub fn len(&self) -> usize {
        self.rows.len() * Action::COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// **Errors** with [`Error::KeyNotFound`] if `state` is not in the table
    pub fn get(&self, state: &State, action: Action) -> Result<f64> {
        self.get_all(state).map(|row| row.get(action))
    }

    /// **Errors** with [`Error::KeyNotFound`] if `state` is not in the table
    pub fn get_all(&self, state: &State) -> Result<&Row> {
        self.rows.get(state).ok_or_else(|| Error::KeyNotFound {
            state: state.to_string(),
        })
    }

    /// **Errors** with [`Error::KeyNotFound`] if `state` is not in the table
    pub fn set(&mut self, state: &State, action: Action, value: f64) -> Result<()> {
        let row = self.rows.get_mut(state).ok_or_else(|| Error::KeyNotFound {
            state: state.to_string(),
        })?;
        row.set(action, value);
        Ok(())
    }

    /// Iterate over rows in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&State, &Row)> {
        self.space
            .states()
            .iter()
            .filter_map(|s| self.rows.get(s).map(|row| (s, row)))
    }

    fn header(&self) -> Vec<String> {
        self.space
            .dimensions()
            .iter()
            .map(|d| d.to_string())
            .chain(["action".to_string(), "value".to_string()])
            .collect()
    }

    /// Write one record per (state, action, value)
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.header())?;

        for (state, row) in self.iter() {
            for (action, value) in row.iter() {
                let mut record: Vec<String> =
                    state.features().iter().map(|f| f.to_string()).collect();
                record.push(action.to_string());
                record.push(value.to_string());
                wtr.write_record(&record)?;
            }
        }

        wtr.flush().map_err(|source| Error::Io {
            operation: "flush value table".to_string(),
            source,
        })
    }

    /// Rebuild a table over `space` from records written by [`QTable::write_csv`]
    ///
    /// Entries without a record stay at zero.
    pub fn read_csv<R: io::Read>(space: StateSpace, reader: R) -> Result<Self> {
        let mut table = Self::new(space);
        let mut rdr = csv::Reader::from_reader(reader);

        let expected = table.header();
        let found: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        if found != expected {
            return Err(Error::config(format!(
                "value table header is `{}`, expected `{}`",
                found.join(","),
                expected.join(",")
            )));
        }

        let n = table.space.dimensions().len();
        for record in rdr.records() {
            let record = record?;
            let fields: Vec<&str> = record.iter().collect();
            let state = table.space.parse(&fields[..n])?;
            let action = Action::from_str(fields[n]).map_err(|_| Error::domain("action", fields[n]))?;
            let value = fields[n + 1]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::domain("value", fields[n + 1]))?;
            table.set(&state, action, value)?;
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        env::Light,
        state::{Dimension, Feature, Traffic},
    };

    fn three_dimensions() -> StateSpace {
        StateSpace::new(vec![
            Dimension::Light,
            Dimension::Waypoint,
            Dimension::Oncoming,
        ])
        .unwrap()
    }

    #[test]
    fn table_is_total_and_zeroed() {
        let table = QTable::new(three_dimensions());
        assert_eq!(table.len(), 32 * 4);
        for state in table.space().states() {
            for &action in Action::VARIANTS {
                let value = table.get(state, action).unwrap();
                assert!(value.is_finite());
                assert_eq!(value, 0.0);
            }
        }
    }

    #[test]
    fn set_overwrites_single_entry() {
        let mut table = QTable::new(three_dimensions());
        let state = table.space().parse(&["red", "left", "none"]).unwrap();
        table.set(&state, Action::Left, 0.5).unwrap();

        assert_eq!(table.get(&state, Action::Left).unwrap(), 0.5);
        let row = table.get_all(&state).unwrap();
        assert_eq!(row.iter().filter(|&(_, v)| v != 0.0).count(), 1);
        let other = table.space().parse(&["green", "left", "none"]).unwrap();
        assert_eq!(table.get(&other, Action::Left).unwrap(), 0.0);
    }

    #[test]
    fn unknown_state_is_key_not_found() {
        let mut table = QTable::new(three_dimensions());
        let state = State::new(vec![Feature::Light(Light::Red)]);
        assert!(matches!(
            table.get(&state, Action::Idle),
            Err(Error::KeyNotFound { .. })
        ));
        assert!(table.get_all(&state).is_err());
        assert!(table.set(&state, Action::Idle, 1.0).is_err());
    }

    #[test]
    fn row_best_actions() {
        let mut row = Row::default();
        assert_eq!(row.best_actions(), Action::VARIANTS, "All zero row is a four way tie");

        row.set(Action::Right, 0.3);
        row.set(Action::Left, 0.3);
        row.set(Action::Idle, -1.0);
        assert_eq!(row.max(), 0.3);
        assert_eq!(row.best_actions(), [Action::Left, Action::Right]);

        row.set(Action::Left, 0.30001);
        assert_eq!(row.best_actions(), [Action::Left]);
    }

    #[test]
    fn csv_round_trip_keeps_values() {
        let mut table = QTable::new(three_dimensions());
        let state = State::new(vec![
            Feature::Light(Light::Green),
            Feature::Waypoint(Action::Forward),
            Feature::Traffic(Traffic::Absent),
        ]);
        table.set(&state, Action::Forward, 1.92).unwrap();
        table.set(&state, Action::Left, -0.4).unwrap();

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("light,waypoint,oncoming,action,value\n"));
        assert!(text.contains("green,forward,none,forward,1.92\n"));
        assert_eq!(text.lines().count(), 1 + 32 * 4);

        let restored = QTable::read_csv(three_dimensions(), buf.as_slice()).unwrap();
        for (s, row) in table.iter() {
            assert_eq!(restored.get_all(s).unwrap(), row);
        }
    }

    #[test]
    fn read_csv_rejects_bad_records() {
        let wrong_header = "light,waypoint,action,value\nred,none,none,0.0\n";
        assert!(matches!(
            QTable::read_csv(three_dimensions(), wrong_header.as_bytes()),
            Err(Error::InvalidConfiguration { .. })
        ));

        let bad_light = "light,waypoint,oncoming,action,value\nblue,none,none,none,0.0\n";
        assert!(matches!(
            QTable::read_csv(three_dimensions(), bad_light.as_bytes()),
            Err(Error::Domain { .. })
        ));

        let bad_value = "light,waypoint,oncoming,action,value\nred,none,none,none,lots\n";
        assert!(matches!(
            QTable::read_csv(three_dimensions(), bad_value.as_bytes()),
            Err(Error::Domain { .. })
        ));
    }
}
