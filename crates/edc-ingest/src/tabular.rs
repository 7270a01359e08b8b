//! CSV-backed tabular reading.
//!
//! A [`CsvSource`] exposes a trimmed header row and a lazy iterator over the
//! data rows, so memory use is bounded by one row at a time rather than the
//! whole file. Rows shorter than the header are padded with empty cells.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecordsIntoIter};
use tracing::debug;

use crate::error::Result;

/// A tabular data source: one header row plus lazily-read data rows.
pub struct CsvSource<R: Read> {
    headers: Vec<String>,
    records: StringRecordsIntoIter<R>,
}

impl CsvSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening tabular source");
        Self::from_reader(File::open(path)?)
    }
}

impl<R: Read> CsvSource<R> {
    /// Read the header row eagerly; data rows stay in the underlying reader.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        let headers = match records.next() {
            Some(record) => record?.iter().map(clean_cell).collect(),
            None => Vec::new(),
        };

        Ok(Self { headers, records })
    }

    /// Header cells in column order, trimmed, including any blank ones
    /// (blanks keep positional alignment with the data rows).
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Non-blank column names, for presenting the source to an operator.
    pub fn column_names(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| !h.is_empty())
            .cloned()
            .collect()
    }

    /// Consume the source, yielding data rows padded to the header width.
    pub fn into_rows(self) -> Rows<R> {
        Rows {
            width: self.headers.len(),
            records: self.records,
        }
    }
}

/// Lazy iterator over data rows.
pub struct Rows<R: Read> {
    width: usize,
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(error) => return Some(Err(error.into())),
        };
        let mut cells: Vec<String> = record.iter().map(clean_cell).collect();
        if cells.len() < self.width {
            cells.resize(self.width, String::new());
        }
        Some(Ok(cells))
    }
}

/// Trim whitespace and UTF-8 byte-order marks, in any interleaving.
fn clean_cell(raw: &str) -> String {
    raw.trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(data: &str) -> CsvSource<&[u8]> {
        CsvSource::from_reader(data.as_bytes()).expect("readable csv")
    }

    #[test]
    fn headers_are_trimmed_and_bom_stripped() {
        let src = source("\u{feff}Age (yrs) , Sex\n34,F\n");
        assert_eq!(src.headers(), ["Age (yrs)", "Sex"]);
    }

    #[test]
    fn bom_and_whitespace_strip_in_any_order() {
        assert_eq!(clean_cell("\u{feff} Age"), "Age");
        assert_eq!(clean_cell(" \u{feff}Age\u{feff} "), "Age");
    }

    #[test]
    fn short_rows_are_padded() {
        let src = source("a,b,c\n1,2\n");
        let rows: Vec<_> = src.into_rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows, vec![vec!["1".to_string(), "2".to_string(), String::new()]]);
    }

    #[test]
    fn column_names_drop_blanks() {
        let src = source("Age,,Sex\n");
        assert_eq!(src.headers().len(), 3);
        assert_eq!(src.column_names(), ["Age", "Sex"]);
    }

    #[test]
    fn empty_input_yields_no_headers_or_rows() {
        let src = source("");
        assert!(src.headers().is_empty());
        assert_eq!(src.into_rows().count(), 0);
    }
}
