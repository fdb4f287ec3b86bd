//! Load orchestration
//!
//! Opens the three input files, then runs the direct pipeline followed by the
//! aggregating pipeline against one shared sink. Nothing is written unless
//! all three inputs could be opened; after that, no transaction spans the
//! two pipelines.

use std::path::Path;

use shipload_database::ShipmentSink;
use shipload_utils::{InputConfig, LoadResult, RecordSource};

use crate::pipeline::{aggregating, direct};
use crate::report::LoadReport;

pub struct Loader<S> {
    sink: S,
    input: InputConfig,
}

impl<S: ShipmentSink> Loader<S> {
    pub fn new(sink: S, input: InputConfig) -> Self {
        Self { sink, input }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load the three input files found in `dir`.
    ///
    /// Fails only when an input is missing or the configuration is unusable;
    /// every other problem ends up in the returned report.
    pub async fn populate(&self, dir: impl AsRef<Path>) -> LoadResult<LoadReport> {
        let dir = dir.as_ref();
        let delimiter = self.input.delimiter_byte()?;
        let [direct_path, lines_path, headers_path] = self.input.paths_in(dir);

        let shipment_log = RecordSource::open(&direct_path, delimiter)?;
        let product_lines = RecordSource::open(&lines_path, delimiter)?;
        let shipment_headers = RecordSource::open(&headers_path, delimiter)?;

        tracing::info!(dir = %dir.display(), "Loading shipment data");

        let mut report = LoadReport::new();
        direct::run(shipment_log.rows(), &self.sink, &mut report).await;
        aggregating::run(shipment_headers.rows(), product_lines.rows(), &self.sink, &mut report).await;
        report.finish();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use shipload_database::{initialize_database, DatabaseConfig, SqliteShipmentSink};
    use shipload_models::Shipment;
    use shipload_utils::LoadError;
    use tempfile::TempDir;

    const SHIPMENT_LOG: &str = "origin_warehouse,destination_store,product,on_time,product_quantity,driver_identifier\n\
                                Tokyo,Osaka,Widget,true,5,d1\n\
                                Tokyo,Nagoya,Gadget,false,abc,d2\n\
                                Seoul,Busan,Gadget,true,2,d3\n";

    const PRODUCT_LINES: &str = "shipment_identifier,product,on_time\n\
                                 S1,Gadget,true\n\
                                 S1,Gadget,true\n\
                                 S1,Bolt,false\n\
                                 S404,Widget,true\n";

    const SHIPMENT_HEADERS: &str = "shipment_identifier,origin_warehouse,destination_store,driver_identifier\n\
                                    S1,Berlin,Paris,d9\n\
                                    S2,Rome,Madrid,d8\n";

    fn write_inputs(dir: &Path) {
        fs::write(dir.join("shipping_data_0.csv"), SHIPMENT_LOG).unwrap();
        fs::write(dir.join("shipping_data_1.csv"), PRODUCT_LINES).unwrap();
        fs::write(dir.join("shipping_data_2.csv"), SHIPMENT_HEADERS).unwrap();
    }

    async fn sqlite_loader(dir: &TempDir) -> Loader<SqliteShipmentSink> {
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("shipment_database.db").display()),
            ..DatabaseConfig::default()
        };
        let pool = initialize_database(&config).await.unwrap();
        Loader::new(SqliteShipmentSink::new(pool), InputConfig::default())
    }

    async fn shipments_by_product(loader: &Loader<SqliteShipmentSink>) -> Vec<(String, i64, String, String)> {
        let products = loader.sink().products().find_all().await.unwrap();
        let shipments: Vec<Shipment> = loader.sink().shipments().find_all().await.unwrap();

        shipments
            .into_iter()
            .map(|s| {
                let name = products
                    .iter()
                    .find(|p| p.id == s.product_id)
                    .map(|p| p.name.clone())
                    .unwrap();
                (name, s.quantity, s.origin, s.destination)
            })
            .collect()
    }

    fn shipment(product: &str, quantity: i64, origin: &str, destination: &str) -> (String, i64, String, String) {
        (product.to_string(), quantity, origin.to_string(), destination.to_string())
    }

    #[tokio::test]
    async fn test_populate_runs_both_pipelines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let loader = sqlite_loader(&dir).await;

        let report = loader.populate(dir.path()).await.unwrap();

        assert_eq!(
            shipments_by_product(&loader).await,
            vec![
                shipment("Widget", 5, "Tokyo", "Osaka"),
                shipment("Gadget", 2, "Seoul", "Busan"),
                shipment("Gadget", 2, "Berlin", "Paris"),
                shipment("Bolt", 1, "Berlin", "Paris"),
            ]
        );

        let names: Vec<String> = loader
            .sink()
            .products()
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Widget", "Gadget", "Bolt"]);

        assert_eq!(report.direct.rows_read, 3);
        assert_eq!(report.direct.rows_skipped, 1);
        assert_eq!(report.direct.records_written, 2);
        assert_eq!(report.aggregating.unmatched_lines, 1);
        assert_eq!(report.aggregating.records_written, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].row, Some(2));
        assert!(report.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_input_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let missing = dir.path().join("shipping_data_2.csv");
        fs::remove_file(&missing).unwrap();
        let loader = sqlite_loader(&dir).await;

        let err = loader.populate(dir.path()).await.unwrap_err();

        assert_eq!(err, LoadError::missing_input(missing.display().to_string()));
        assert!(err.is_fatal());
        assert_eq!(loader.sink().products().count().await.unwrap(), 0);
        assert_eq!(loader.sink().shipments().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rerun_dedupes_products_but_not_shipments() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let loader = sqlite_loader(&dir).await;

        loader.populate(dir.path()).await.unwrap();
        let products_after_first = loader.sink().products().count().await.unwrap();
        let shipments_after_first = loader.sink().shipments().count().await.unwrap();

        loader.populate(dir.path()).await.unwrap();

        assert_eq!(loader.sink().products().count().await.unwrap(), products_after_first);
        assert_eq!(
            loader.sink().shipments().count().await.unwrap(),
            shipments_after_first * 2
        );
    }

    #[tokio::test]
    async fn test_products_are_shared_across_pipelines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("shipping_data_0.csv"),
            "o,d,product,on_time,qty\nTokyo,Osaka,Gadget,true,1\n",
        )
        .unwrap();
        fs::write(dir.path().join("shipping_data_1.csv"), "id,product\nS1,Gadget\n").unwrap();
        fs::write(dir.path().join("shipping_data_2.csv"), "id,origin,destination\nS1,Berlin,Paris\n").unwrap();
        let loader = sqlite_loader(&dir).await;

        let report = loader.populate(dir.path()).await.unwrap();

        assert!(report.is_clean());
        assert_eq!(loader.sink().products().count().await.unwrap(), 1);
        assert_eq!(loader.sink().shipments().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_custom_file_names_and_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("log.txt"), "o;d;p;x;q\nLima;Quito;Valve;x;7\n").unwrap();
        fs::write(dir.path().join("lines.txt"), "id;product\n").unwrap();
        fs::write(dir.path().join("headers.txt"), "id;origin;destination\n").unwrap();

        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("custom.db").display()),
            ..DatabaseConfig::default()
        };
        let pool = initialize_database(&config).await.unwrap();
        let input = InputConfig {
            direct_file: "log.txt".to_string(),
            lines_file: "lines.txt".to_string(),
            headers_file: "headers.txt".to_string(),
            delimiter: ";".to_string(),
            ..InputConfig::default()
        };
        let loader = Loader::new(SqliteShipmentSink::new(pool), input);

        loader.populate(dir.path()).await.unwrap();

        assert_eq!(shipments_by_product(&loader).await, vec![shipment("Valve", 7, "Lima", "Quito")]);
    }
}
