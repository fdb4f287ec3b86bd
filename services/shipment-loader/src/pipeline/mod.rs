//! Normalization Engine
//!
//! Both pipelines reduce their input to `ShipmentRecord`s and hand each one
//! to `persist`, which performs the product-then-shipment write sequence
//! against the sink.

pub mod direct;
pub mod aggregating;

use shipload_database::ShipmentSink;
use shipload_models::ShipmentRecord;
use shipload_utils::{LoadError, LoadResult};

use crate::report::{LoadReport, Pipeline};

/// Positional field access with a diagnostic naming the missing column
pub(crate) fn field<'a>(row: &'a [String], position: usize, name: &str, row_index: usize) -> LoadResult<&'a str> {
    row.get(position).map(String::as_str).ok_or_else(|| {
        LoadError::malformed_field(
            row_index,
            name,
            format!("expected at least {} fields, found {}", position + 1, row.len()),
        )
    })
}

/// Upsert the record's product, resolve its id and append the shipment.
///
/// Failures are recorded on the report and never propagate. Returns whether
/// a shipment row was written.
pub(crate) async fn persist<S>(
    sink: &S,
    record: &ShipmentRecord,
    pipeline: Pipeline,
    row: Option<usize>,
    report: &mut LoadReport,
) -> bool
where
    S: ShipmentSink + ?Sized,
{
    // A failed upsert is reported but the lookup still runs: the product may
    // already exist from an earlier row.
    if let Err(e) = sink.upsert_product(&record.product_name).await {
        report.record(pipeline, row, LoadError::storage(format!("{:#}", e)));
    }

    let product_id = match sink.resolve_product_id(&record.product_name).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            report.record(pipeline, row, LoadError::dangling_reference(&record.product_name));
            report.stats_mut(pipeline).records_failed += 1;
            return false;
        }
        Err(e) => {
            report.record(pipeline, row, LoadError::storage(format!("{:#}", e)));
            report.stats_mut(pipeline).records_failed += 1;
            return false;
        }
    };

    match sink.append_shipment(&record.for_product(product_id)).await {
        Ok(shipment_id) => {
            tracing::trace!(
                shipment_id,
                product = %record.product_name,
                quantity = record.quantity,
                "Appended shipment"
            );
            report.stats_mut(pipeline).records_written += 1;
            true
        }
        Err(e) => {
            report.record(pipeline, row, LoadError::storage(format!("{:#}", e)));
            report.stats_mut(pipeline).records_failed += 1;
            false
        }
    }
}
