//! Record Source
//!
//! Reads delimited input files into ordered rows of text fields.
//! Fields are addressed by position; the header row is handed to callers
//! like any other row and skipping it is their job.

pub mod source;

pub use source::{RecordSource, Row, Rows};
