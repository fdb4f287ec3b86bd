//! Property-based tests for the shipment aggregation model

use proptest::prelude::*;

use crate::{ShipmentAggregate, ShipmentRecord};

prop_compose! {
    fn arb_product_name()(name in "[A-Z][a-z]{2,10}") -> String {
        name
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// N units of the same product collapse into one record with quantity N
    #[test]
    fn prop_repeated_units_collapse(name in arb_product_name(), units in 1usize..50) {
        let mut aggregate = ShipmentAggregate::new("S1", "Berlin", "Paris");
        for _ in 0..units {
            aggregate.add_unit(&name);
        }

        let records = aggregate.into_records();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(
            &records[0],
            &ShipmentRecord::new(name.clone(), units as i64, "Berlin", "Paris")
        );
    }

    /// Total quantity across records equals the number of units added,
    /// and there is one record per distinct product
    #[test]
    fn prop_units_are_conserved(names in prop::collection::vec(arb_product_name(), 0..40)) {
        let mut aggregate = ShipmentAggregate::new("S9", "Oslo", "Lima");
        for name in &names {
            aggregate.add_unit(name);
        }

        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();

        let records = aggregate.into_records();
        prop_assert_eq!(records.len(), distinct.len());
        prop_assert_eq!(records.iter().map(|r| r.quantity).sum::<i64>(), names.len() as i64);
    }

    /// Products flush in first-seen order
    #[test]
    fn prop_first_seen_order(names in prop::collection::vec(arb_product_name(), 1..20)) {
        let mut aggregate = ShipmentAggregate::new("S3", "Kyiv", "Riga");
        let mut expected: Vec<String> = Vec::new();
        for name in &names {
            aggregate.add_unit(name);
            if !expected.contains(name) {
                expected.push(name.clone());
            }
        }

        let order: Vec<String> = aggregate.into_records().into_iter().map(|r| r.product_name).collect();
        prop_assert_eq!(order, expected);
    }
}
