//! Load Report
//!
//! Structured outcome of one `populate` run: per-pipeline counters and every
//! row-level problem that was skipped over. Each diagnostic is also logged
//! at `warn` when recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shipload_utils::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Direct,
    Aggregating,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Aggregating => "aggregating",
        }
    }
}

/// Counters for one pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Data rows read, header rows excluded
    pub rows_read: usize,
    /// Rows skipped as malformed
    pub rows_skipped: usize,
    /// Product lines naming a shipment absent from the header stream
    pub unmatched_lines: usize,
    /// Shipment rows appended to the store
    pub records_written: usize,
    /// Shipment records lost to storage errors or unresolved products
    pub records_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub pipeline: Pipeline,
    /// Zero-based input row, header counted as row 0
    pub row: Option<usize>,
    pub error: LoadError,
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        self.error.error_code()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub direct: PipelineStats,
    pub aggregating: PipelineStats,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            direct: PipelineStats::default(),
            aggregating: PipelineStats::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn stats(&self, pipeline: Pipeline) -> &PipelineStats {
        match pipeline {
            Pipeline::Direct => &self.direct,
            Pipeline::Aggregating => &self.aggregating,
        }
    }

    pub fn stats_mut(&mut self, pipeline: Pipeline) -> &mut PipelineStats {
        match pipeline {
            Pipeline::Direct => &mut self.direct,
            Pipeline::Aggregating => &mut self.aggregating,
        }
    }

    /// Record a non-fatal problem and log it
    pub fn record(&mut self, pipeline: Pipeline, row: Option<usize>, error: LoadError) {
        match row {
            Some(row) => tracing::warn!(
                pipeline = pipeline.as_str(),
                row,
                code = error.error_code(),
                "{}. Skipping.",
                error
            ),
            None => tracing::warn!(
                pipeline = pipeline.as_str(),
                code = error.error_code(),
                "{}. Skipping.",
                error
            ),
        }

        self.diagnostics.push(Diagnostic {
            pipeline,
            row,
            error,
        });
    }

    /// Diagnostics with the given error code, in the order they were recorded
    pub fn diagnostics_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.code() == code)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn records_written(&self) -> usize {
        self.direct.records_written + self.aggregating.records_written
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn log_summary(&self) {
        for pipeline in [Pipeline::Direct, Pipeline::Aggregating] {
            let stats = self.stats(pipeline);
            tracing::info!(
                run_id = %self.run_id,
                pipeline = pipeline.as_str(),
                rows_read = stats.rows_read,
                rows_skipped = stats.rows_skipped,
                unmatched_lines = stats.unmatched_lines,
                records_written = stats.records_written,
                records_failed = stats.records_failed,
                "Pipeline finished"
            );
        }

        if self.is_clean() {
            tracing::info!(
                run_id = %self.run_id,
                records_written = self.records_written(),
                "Load completed"
            );
        } else {
            tracing::warn!(
                run_id = %self.run_id,
                records_written = self.records_written(),
                malformed = self.diagnostics_with_code("MALFORMED_FIELD").count(),
                storage = self.diagnostics_with_code("STORAGE_CONSTRAINT").count(),
                dangling = self.diagnostics_with_code("DANGLING_REFERENCE").count(),
                "Load completed with diagnostics"
            );
        }
    }
}

impl Default for LoadReport {
    fn default() -> Self {
        Self::new()
    }
}
