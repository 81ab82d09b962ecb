//! Minimal header-aware CSV reader.
//!
//! Handles quoted fields (including embedded commas, doubled quotes and
//! newlines), CRLF line endings, a leading byte-order mark and blank lines.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::loader::Record;
use crate::error::{Result, SwayError};

/// Parsed CSV: a header and its data rows.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one data row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    fields: &'a [String],
}

impl Record for CsvRow<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        let idx = *self.table.index.get(name)?;
        self.fields.get(idx).map(String::as_str)
    }
}

impl CsvTable {
    /// Parse CSV text whose first record is the header.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = split_records(text).into_iter();

        let headers: Vec<String> = records
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        // A repeated header name resolves to its first column.
        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }

        Self {
            headers,
            index,
            rows: records.collect(),
        }
    }

    /// Read and parse a file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SwayError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Fail with [`SwayError::MissingColumn`] unless every column is present.
    pub fn require_columns(&self, columns: &[&'static str]) -> Result<()> {
        match columns.iter().find(|c| !self.index.contains_key(**c)) {
            Some(missing) => Err(SwayError::MissingColumn(*missing)),
            None => Ok(()),
        }
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the file had a header only.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.rows.iter().map(move |fields| CsvRow {
            table: self,
            fields,
        })
    }
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }
    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}
