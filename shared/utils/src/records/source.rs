//! Delimited file reader
//!
//! Wraps `csv::Reader` with header handling disabled and flexible row widths,
//! so every non-blank row (header included) comes back as a `Row` tagged with
//! the physical line it starts on.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator};

use crate::error::{LoadError, LoadResult};

/// One input row, fields in file order
pub type Row = Vec<String>;

pub struct RecordSource<R: Read = File> {
    label: String,
    reader: csv::Reader<R>,
}

impl RecordSource<File> {
    /// Open a delimited file.
    ///
    /// A missing file is reported as `LoadError::MissingInput` naming the path.
    pub fn open(path: impl AsRef<Path>, delimiter: u8) -> LoadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::missing_input(path.display().to_string()),
            _ => LoadError::io(format!("{}: {}", path.display(), e)),
        })?;

        Ok(Self::from_reader(path.display().to_string(), file, delimiter))
    }
}

impl<R: Read> RecordSource<R> {
    pub fn from_reader(label: impl Into<String>, reader: R, delimiter: u8) -> Self {
        // LF is the only terminator so the line counter advances once per
        // physical line for both LF and CRLF files.
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_reader(reader);

        Self {
            label: label.into(),
            reader,
        }
    }

    /// Human readable origin of the rows, usually the file path
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the source into a lazy row iterator.
    /// Reading the rows again requires reopening the file.
    pub fn rows(self) -> Rows<R> {
        Rows {
            label: self.label,
            reader: self.reader,
            record: StringRecord::new(),
            next_index: 0,
        }
    }
}

/// Row iterator yielding `(row_index, row)`.
///
/// The index is the zero-based physical line a row starts on, so the header
/// is row 0 and blank lines still count even though they yield nothing.
pub struct Rows<R: Read> {
    label: String,
    reader: csv::Reader<R>,
    record: StringRecord,
    next_index: usize,
}

impl<R: Read> Rows<R> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Index of the record just read. By now the reader's line counter has
    /// passed any blank lines, newlines quoted inside fields and the record's
    /// own terminator.
    fn locate(&mut self, embedded_newlines: usize) -> usize {
        let line = self.reader.position().line() as usize;
        let index = line
            .saturating_sub(embedded_newlines + 2)
            .max(self.next_index);
        self.next_index = index + embedded_newlines + 1;
        index
    }
}

impl<R: Read> Iterator for Rows<R> {
    type Item = (usize, LoadResult<Row>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(e) => {
                    let index = self.locate(0);
                    return Some((index, Err(LoadError::from(e))));
                }
            }

            let mut row: Row = self.record.iter().map(str::to_string).collect();
            let embedded = row.iter().map(|f| f.matches('\n').count()).sum();
            let index = self.locate(embedded);

            // blank CRLF line
            if row.len() == 1 && row[0] == "\r" {
                continue;
            }
            if let Some(last) = row.last_mut() {
                if last.ends_with('\r') {
                    last.pop();
                }
            }

            return Some((index, Ok(row)));
        }
    }
}
