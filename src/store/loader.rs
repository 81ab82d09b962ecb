//! Turning raw rows into per-participant series.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::series::{ParticipantSeries, Sample};
use crate::types::{Channel, Condition, ParticipantId};

/// Column holding the participant identifier.
pub const SUBJECT_COLUMN: &str = "subject_id";
/// Column holding the sample time in seconds.
pub const TIME_COLUMN: &str = "Second";

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = [SUBJECT_COLUMN, TIME_COLUMN, "CoPx", "CoPy"];

/// A row of named text fields.
pub trait Record {
    /// Raw text of a field, if the row has it.
    fn field(&self, name: &str) -> Option<&str>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for HashMap<&str, &str> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).copied()
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// All series recorded under one condition.
///
/// Every participant present holds at least one sample; deserializing a
/// participant with an empty series fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDataset {
    condition: Condition,
    participants: BTreeMap<ParticipantId, ParticipantSeries>,
    dropped_rows: usize,
}

impl ConditionDataset {
    /// Condition this dataset was recorded under.
    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// Series for one participant.
    pub fn get(&self, participant: ParticipantId) -> Option<&ParticipantSeries> {
        self.participants.get(&participant)
    }

    /// Participant ids in ascending order.
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participants.keys().copied()
    }

    /// `(id, series)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, &ParticipantSeries)> {
        self.participants.iter().map(|(id, s)| (*id, s))
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True when no row survived parsing.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Total samples across participants.
    pub fn sample_count(&self) -> usize {
        self.participants.values().map(ParticipantSeries::len).sum()
    }

    /// Rows discarded because a required field failed to parse.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// One channel flattened over all participants.
    ///
    /// Participants are visited in ascending id order and each contributes
    /// its samples in time order.
    pub fn pooled(&self, channel: Channel) -> Vec<f64> {
        self.participants
            .values()
            .flat_map(|s| s.channel_values(channel))
            .collect()
    }
}

/// Build the dataset for `condition` from already-fetched rows.
///
/// Rows whose participant id, time, CoPx or CoPy do not parse are dropped.
/// Missing or malformed moment columns leave `mx`/`my` empty but keep the row.
pub fn load<I>(condition: Condition, rows: I) -> ConditionDataset
where
    I: IntoIterator,
    I::Item: Record,
{
    let mut grouped: BTreeMap<ParticipantId, Vec<Sample>> = BTreeMap::new();
    let mut dropped_rows = 0usize;

    for row in rows {
        match parse_row(&row) {
            Some((id, sample)) => grouped.entry(id).or_default().push(sample),
            None => dropped_rows += 1,
        }
    }

    let participants: BTreeMap<_, _> = grouped
        .into_iter()
        .filter_map(|(id, samples)| ParticipantSeries::from_samples(samples).map(|s| (id, s)))
        .collect();

    if dropped_rows > 0 {
        debug!(%condition, dropped_rows, "dropped rows that failed to parse");
    }

    ConditionDataset {
        condition,
        participants,
        dropped_rows,
    }
}

fn parse_row<R: Record>(row: &R) -> Option<(ParticipantId, Sample)> {
    let id = parse_participant(row.field(SUBJECT_COLUMN)?)?;
    let time = parse_number(row.field(TIME_COLUMN)?)?;
    if time < 0.0 {
        return None;
    }
    let cop_x = parse_number(row.field(Channel::CopX.column())?)?;
    let cop_y = parse_number(row.field(Channel::CopY.column())?)?;

    let mut sample = Sample::new(time, cop_x, cop_y);
    sample.mx = row.field(Channel::Mx.column()).and_then(parse_number);
    sample.my = row.field(Channel::My.column()).and_then(parse_number);
    Some((id, sample))
}

/// Positive integer id; integral decimals such as `"7.0"` are accepted.
fn parse_participant(raw: &str) -> Option<ParticipantId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<ParticipantId>() {
        return (id > 0).then_some(id);
    }
    let value = raw.parse::<f64>().ok()?;
    let integral = value.is_finite() && value.fract() == 0.0;
    (integral && value >= 1.0 && value <= f64::from(ParticipantId::MAX)).then(|| value as ParticipantId)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
