//! Direct pipeline
//!
//! Shipment log rows map one-to-one onto shipment records:
//! `[origin, destination, product, _, quantity, ...]`.

use std::io::Read;

use tracing::Instrument;

use shipload_database::ShipmentSink;
use shipload_models::ShipmentRecord;
use shipload_utils::{LoadError, LoadResult, Rows};

use super::{field, persist};
use crate::report::{LoadReport, Pipeline};

const ORIGIN: usize = 0;
const DESTINATION: usize = 1;
const PRODUCT: usize = 2;
const QUANTITY: usize = 4;

/// Normalize one data row. `row_index` is only used for diagnostics.
pub fn parse_row(row_index: usize, row: &[String]) -> LoadResult<ShipmentRecord> {
    let origin = field(row, ORIGIN, "origin", row_index)?;
    let destination = field(row, DESTINATION, "destination", row_index)?;
    let product = field(row, PRODUCT, "product", row_index)?;
    let raw_quantity = field(row, QUANTITY, "quantity", row_index)?;

    let quantity: i64 = raw_quantity.trim().parse().map_err(|e| {
        LoadError::malformed_field(
            row_index,
            "quantity",
            format!("invalid quantity '{}': {}", raw_quantity, e),
        )
    })?;

    Ok(ShipmentRecord::new(product, quantity, origin, destination))
}

pub async fn run<R, S>(rows: Rows<R>, sink: &S, report: &mut LoadReport)
where
    R: Read,
    S: ShipmentSink + ?Sized,
{
    let span = tracing::info_span!("direct_pipeline", source = %rows.label());

    async {
        for (row_index, row) in rows {
            if row_index == 0 {
                continue;
            }
            report.direct.rows_read += 1;

            let record = match row.and_then(|row| parse_row(row_index, &row)) {
                Ok(record) => record,
                Err(e) => {
                    report.direct.rows_skipped += 1;
                    report.record(Pipeline::Direct, Some(row_index), e);
                    continue;
                }
            };

            persist(sink, &record, Pipeline::Direct, Some(row_index), report).await;
        }
    }
    .instrument(span)
    .await
}
