//! Loading sway recordings into per-condition, per-participant series.
//!
//! Rows arrive already fetched (from [`CsvTable`] or any other [`Record`]
//! source); [`load`] turns them into a [`ConditionDataset`] and
//! [`load_corpus`] reads one file per condition into a [`Corpus`].

mod corpus;
mod csv;
mod loader;
mod series;

pub use corpus::{load_corpus, load_source, Corpus};
pub use csv::{CsvRow, CsvTable};
pub use loader::{load, ConditionDataset, Record, REQUIRED_COLUMNS, SUBJECT_COLUMN, TIME_COLUMN};
pub use series::{ParticipantSeries, Sample};
