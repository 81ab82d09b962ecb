//! Report formatting for terminals and JSON consumers.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_corpus_summary, format_report};
