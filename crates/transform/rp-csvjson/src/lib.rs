//! CSV record to JSON document transformer.
//!
//! [`JsonRecords`] wraps a `csv::Reader` and yields one serialized JSON
//! document per data row, pairing the captured header with each record
//! positionally. Header policy is owned here, not by the CSV layer: the
//! wrapped reader runs with `has_headers(false)` and `flexible(true)`
//! so that the transformer decides what a header is and reports width
//! mismatches itself.

use rp_error::{ReadError, RowError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io;

/// Default number of leading header rows.
pub const DEFAULT_HEADER_ROWS: u32 = 1;

/// Default indent for indented output: three spaces.
pub const DEFAULT_INDENT: &str = "   ";

/// Output formatting for serialized documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonFormat {
    /// No embedded whitespace
    Compact,
    /// Pretty-printed with the given indent string
    Indented(String),
}

impl JsonFormat {
    /// Indented output with the default three-space indent.
    pub fn indented() -> Self {
        Self::Indented(DEFAULT_INDENT.to_string())
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::Compact
    }
}

/// Streaming CSV-to-JSON row transformer.
///
/// The first of the configured header rows supplies the column names;
/// the remaining header rows are read and discarded. With zero header
/// rows, names are synthesized as `column0, column1, ...` from the
/// width of the first data record.
///
/// Duplicate header names collapse in the document, last value wins.
/// Uniqueness is deliberately not enforced; the upstream exports never
/// promise it.
pub struct JsonRecords<R: io::Read> {
    reader: csv::Reader<R>,
    header_rows: u32,
    format: JsonFormat,
    headers: Vec<String>,
    rows_seen: u64,
    // Reused across reads; header values are cloned out of it.
    record: csv::StringRecord,
}

impl<R: io::Read> JsonRecords<R> {
    /// Creates a transformer over a raw byte reader with the default
    /// header policy (one header row) and compact output.
    pub fn from_reader(reader: R) -> Self {
        let csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Self {
            reader: csv_reader,
            header_rows: DEFAULT_HEADER_ROWS,
            format: JsonFormat::default(),
            headers: Vec::new(),
            rows_seen: 0,
            record: csv::StringRecord::new(),
        }
    }

    /// Sets the number of leading header rows (0 = headerless input).
    pub fn with_header_rows(mut self, header_rows: u32) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Sets the output formatting mode.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// The captured (or synthesized) column names. Empty until the first
    /// read that establishes them.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reads the next data row and returns its serialized document.
    ///
    /// Returns `Ok(None)` once the input is exhausted; end-of-input is
    /// not an error. A [`ReadError::Row`] drops only that row, the
    /// caller may keep reading. Any other error poisons the stream.
    pub fn read(&mut self) -> Result<Option<Vec<u8>>, ReadError> {
        // Consume header rows. Only the very first row supplies names.
        while self.rows_seen < u64::from(self.header_rows) {
            if !self.read_record()? {
                return Ok(None);
            }
            if self.rows_seen == 1 {
                self.headers = self.record.iter().map(String::from).collect();
            }
        }

        if !self.read_record()? {
            return Ok(None);
        }

        // Headerless input: synthesize names from the first data row.
        if self.headers.is_empty() {
            self.headers = (0..self.record.len()).map(|i| format!("column{i}")).collect();
        }

        if self.record.len() != self.headers.len() {
            return Err(RowError::ShapeMismatch {
                expected: self.headers.len(),
                actual: self.record.len(),
            }
            .into());
        }

        let mut document = serde_json::Map::with_capacity(self.headers.len());
        for (name, value) in self.headers.iter().zip(self.record.iter()) {
            // Last value wins on duplicate names.
            document.insert(name.clone(), serde_json::Value::String(value.to_string()));
        }

        let payload = self
            .serialize(&document)
            .map_err(|error| RowError::Serialize(error.to_string()))?;
        Ok(Some(payload))
    }

    fn serialize(
        &self,
        document: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<u8>, serde_json::Error> {
        match &self.format {
            JsonFormat::Compact => serde_json::to_vec(document),
            JsonFormat::Indented(indent) => {
                let mut buf = Vec::with_capacity(128);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                document.serialize(&mut serializer)?;
                Ok(buf)
            }
        }
    }

    /// Reads one record into the reused buffer, advancing the row
    /// cursor. Returns false at end of input.
    fn read_record(&mut self) -> Result<bool, ReadError> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                self.rows_seen += 1;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(error) => {
                self.rows_seen += 1;
                Err(map_csv_error(error))
            }
        }
    }
}

fn map_csv_error(error: csv::Error) -> ReadError {
    if error.is_io_error() {
        ReadError::Io(error.to_string())
    } else {
        ReadError::Csv(error.to_string())
    }
}
