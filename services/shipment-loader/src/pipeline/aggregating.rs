//! Aggregating pipeline
//!
//! Joins the shipment header stream `[shipment_id, origin, destination, ...]`
//! with the product line stream `[shipment_id, product, ...]`. Every line is
//! one unit, so repeated `(shipment, product)` lines collapse into a single
//! shipment record whose quantity is the line count.
//!
//! The header stream is consumed completely before the first line is looked
//! at; lines for shipments without a header are dropped.

use std::collections::HashMap;
use std::io::Read;

use tracing::Instrument;

use shipload_database::ShipmentSink;
use shipload_models::ShipmentAggregate;
use shipload_utils::{LoadResult, Rows};

use super::{field, persist};
use crate::report::{LoadReport, Pipeline};

/// Shipment aggregates keyed by shipment id, kept in header order
#[derive(Debug, Default)]
pub struct AggregateTable {
    positions: HashMap<String, usize>,
    aggregates: Vec<ShipmentAggregate>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shipment header. A repeated id overwrites origin and
    /// destination but keeps its position and any counts.
    pub fn insert_header(&mut self, shipment_id: &str, origin: &str, destination: &str) {
        match self.positions.get(shipment_id) {
            Some(&idx) => {
                let aggregate = &mut self.aggregates[idx];
                aggregate.origin = origin.to_string();
                aggregate.destination = destination.to_string();
            }
            None => {
                self.positions
                    .insert(shipment_id.to_string(), self.aggregates.len());
                self.aggregates
                    .push(ShipmentAggregate::new(shipment_id, origin, destination));
            }
        }
    }

    /// Count one unit of `product` against a known shipment.
    /// Returns `false` when the shipment id has no header.
    pub fn add_line(&mut self, shipment_id: &str, product: &str) -> bool {
        match self.positions.get(shipment_id) {
            Some(&idx) => {
                self.aggregates[idx].add_unit(product);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// Aggregates in header order
    pub fn into_aggregates(self) -> Vec<ShipmentAggregate> {
        self.aggregates
    }
}

pub fn parse_header_row(row_index: usize, row: &[String]) -> LoadResult<(String, String, String)> {
    let shipment_id = field(row, 0, "shipment_identifier", row_index)?;
    let origin = field(row, 1, "origin", row_index)?;
    let destination = field(row, 2, "destination", row_index)?;

    Ok((shipment_id.to_string(), origin.to_string(), destination.to_string()))
}

pub fn parse_line_row(row_index: usize, row: &[String]) -> LoadResult<(String, String)> {
    let shipment_id = field(row, 0, "shipment_identifier", row_index)?;
    let product = field(row, 1, "product", row_index)?;

    Ok((shipment_id.to_string(), product.to_string()))
}

/// Build the aggregate table from both streams. Malformed rows are recorded
/// on the report and skipped.
pub fn aggregate<RH, RL>(headers: Rows<RH>, lines: Rows<RL>, report: &mut LoadReport) -> AggregateTable
where
    RH: Read,
    RL: Read,
{
    let mut table = AggregateTable::new();

    for (row_index, row) in headers {
        if row_index == 0 {
            continue;
        }
        report.aggregating.rows_read += 1;

        match row.and_then(|row| parse_header_row(row_index, &row)) {
            Ok((shipment_id, origin, destination)) => {
                table.insert_header(&shipment_id, &origin, &destination)
            }
            Err(e) => {
                report.aggregating.rows_skipped += 1;
                report.record(Pipeline::Aggregating, Some(row_index), e);
            }
        }
    }

    for (row_index, row) in lines {
        if row_index == 0 {
            continue;
        }
        report.aggregating.rows_read += 1;

        match row.and_then(|row| parse_line_row(row_index, &row)) {
            Ok((shipment_id, product)) => {
                if !table.add_line(&shipment_id, &product) {
                    tracing::debug!(
                        row = row_index,
                        shipment_id = %shipment_id,
                        "Dropping product line for unknown shipment"
                    );
                    report.aggregating.unmatched_lines += 1;
                }
            }
            Err(e) => {
                report.aggregating.rows_skipped += 1;
                report.record(Pipeline::Aggregating, Some(row_index), e);
            }
        }
    }

    table
}

pub async fn run<RH, RL, S>(headers: Rows<RH>, lines: Rows<RL>, sink: &S, report: &mut LoadReport)
where
    RH: Read,
    RL: Read,
    S: ShipmentSink + ?Sized,
{
    let span = tracing::info_span!(
        "aggregating_pipeline",
        headers = %headers.label(),
        lines = %lines.label()
    );

    async {
        let table = aggregate(headers, lines, report);
        if table.is_empty() {
            tracing::info!("No shipment headers found");
        }
        tracing::debug!(shipments = table.len(), "Aggregated product lines");

        for aggregate in table.into_aggregates() {
            tracing::debug!(
                shipment_id = %aggregate.shipment_id,
                products = aggregate.product_count(),
                "Flushing shipment"
            );
            for record in aggregate.into_records() {
                persist(sink, &record, Pipeline::Aggregating, None, report).await;
            }
        }
    }
    .instrument(span)
    .await
}
