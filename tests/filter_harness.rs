#![allow(unused)]
//! Filter engine integration harness.
//!
//! # What this covers
//!
//! - **Match rules**: name, string value and value-list element matches over
//!   the shared sample inventory, case-insensitively.
//! - **Counting**: one match per characteristic, one per matching value-list
//!   element, zero counts kept for every device.
//! - **Shape**: result devices mirror the input, devices without
//!   characteristics come back as `{}`, `noOfDevices` is carried verbatim.
//! - **Properties** (proptest): subset, count coverage, total = sum,
//!   idempotence and case-insensitivity over generated inventories.
//!
//! # Running
//!
//! ```sh
//! cargo test --test filter_harness
//! ```

mod common;

use common::*;
use invex_core::{filter, FilterOutcome, Inventory};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{json, Map, Value};

fn run(query: &str, doc: &Value) -> FilterOutcome {
    filter(query, &Inventory::from(doc))
}

fn counts(outcome: &FilterOutcome) -> Value {
    serde_json::to_value(&outcome.match_counts).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios over the sample inventory
// ---------------------------------------------------------------------------

#[rstest]
#[case::color_value("red", json!({"0": 1, "1": 1, "2": 0}), 2)]
#[case::key_name("facing", json!({"0": 1, "1": 1, "2": 0}), 2)]
#[case::upper_case_query("FACING", json!({"0": 1, "1": 1, "2": 0}), 2)]
#[case::value_list_element("2", json!({"0": 1, "1": 0, "2": 0}), 1)]
#[case::shared_prefix("android", json!({"0": 4, "1": 1, "2": 0}), 5)]
#[case::mixed_case_names("AVAILABLE", json!({"0": 3, "1": 1, "2": 0}), 4)]
#[case::numbers_never_match("90", json!({"0": 0, "1": 0, "2": 0}), 0)]
#[case::booleans_never_match("true", json!({"0": 0, "1": 0, "2": 0}), 0)]
#[case::empty_query("", json!({"0": 0, "1": 0, "2": 0}), 0)]
#[case::no_hits("zzz", json!({"0": 0, "1": 0, "2": 0}), 0)]
fn sample_inventory_counts(#[case] query: &str, #[case] expected: Value, #[case] total: usize) {
    let outcome = run(query, &sample_inventory());
    assert_eq!(counts(&outcome), expected);
    assert_eq!(outcome.total_matches, total);
}

#[test]
fn result_keeps_only_matching_characteristics() {
    let result = run("red", &sample_inventory()).result.to_value();
    assert_eq!(
        result,
        json!({
            "noOfDevices": 3,
            "devices": {
                "0": {"characteristics": {"Color": "Red"}},
                "1": {"characteristics": {"Color": "red-ish"}},
                "2": {}
            }
        })
    );
}

#[test]
fn value_list_is_kept_whole() {
    let result = run("3", &sample_inventory()).result.to_value();
    assert_eq!(
        result["devices"]["0"]["characteristics"]["android.control.aeAvailableModes"],
        value_list("byte", &["0", "1", "2", "3"])
    );
    assert_eq!(result["devices"]["1"]["characteristics"], json!({}));
}

#[test]
fn each_matching_element_counts() {
    let doc = InventoryBuilder::new()
        .device("7", json!({"modes": value_list("int32", &["10", "11", "12", "20"])}))
        .build();
    let outcome = run("1", &doc);
    assert_eq!(outcome.match_counts["7"], 3);
    assert_eq!(outcome.total_matches, 3);
}

#[test]
fn name_match_counts_once_per_characteristic() {
    let doc = InventoryBuilder::new()
        .device("0", json!({"modes": value_list("byte", &["modes-a", "modes-b"])}))
        .build();
    assert_eq!(run("modes", &doc).match_counts["0"], 1);
}

#[test]
fn no_of_devices_is_carried_verbatim() {
    let doc = InventoryBuilder::new()
        .device("0", json!({"Facing": "Back"}))
        .no_of_devices(json!("lots"))
        .build();
    assert_eq!(run("x", &doc).result.to_value()["noOfDevices"], json!("lots"));
}

#[test]
fn missing_devices_gives_empty_outcome() {
    let outcome = run("red", &json!({"noOfDevices": 0}));
    assert!(outcome.match_counts.is_empty());
    assert_eq!(outcome.total_matches, 0);
    assert_eq!(outcome.result.to_value(), json!({"noOfDevices": 0}));
}

#[test]
fn malformed_devices_is_treated_as_empty() {
    let outcome = run("red", &json!({"devices": ["not", "a", "map"]}));
    assert!(outcome.match_counts.is_empty());
    assert_eq!(outcome.result.to_value(), json!({"devices": {}}));
}

#[test]
fn input_is_left_untouched() {
    let doc = sample_inventory();
    let before = doc.clone();
    let _ = run("red", &doc);
    assert_eq!(doc, before);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_characteristic() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-cA-C ]{0,4}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        prop::collection::vec("[a-c0-2]{1,3}", 0..4)
            .prop_map(|values| json!({"type": "byte", "count": values.len(), "values": values})),
        prop::collection::vec(any::<u8>(), 0..3).prop_map(|v| json!(v)),
    ]
}

fn arb_inventory() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(
        "[0-9]{1,2}",
        prop::collection::btree_map("[a-cA-C.]{1,5}", arb_characteristic(), 0..5),
        0..4,
    )
    .prop_map(|devices| {
        let devices: Map<String, Value> = devices
            .into_iter()
            .map(|(id, chars)| (id, json!({ "characteristics": chars })))
            .collect();
        json!({ "noOfDevices": devices.len(), "devices": devices })
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-cA-C0-2.]{1,2}"
}

proptest! {
    #[test]
    fn result_is_a_subset_of_the_input(doc in arb_inventory(), query in arb_query()) {
        let result = run(&query, &doc).result.to_value();
        for (id, device) in result["devices"].as_object().unwrap() {
            let chars = device["characteristics"].as_object().unwrap();
            for (name, value) in chars {
                prop_assert_eq!(&doc["devices"][id]["characteristics"][name], value);
            }
        }
    }

    #[test]
    fn every_device_gets_a_count(doc in arb_inventory(), query in arb_query()) {
        let outcome = run(&query, &doc);
        let ids: Vec<&String> = doc["devices"].as_object().unwrap().keys().collect();
        let counted: Vec<&String> = outcome.match_counts.keys().collect();
        prop_assert_eq!(ids, counted);
    }

    #[test]
    fn total_is_sum_of_counts(doc in arb_inventory(), query in arb_query()) {
        let outcome = run(&query, &doc);
        prop_assert_eq!(outcome.total_matches, outcome.match_counts.values().sum::<usize>());
    }

    #[test]
    fn count_is_at_least_kept_characteristics(doc in arb_inventory(), query in arb_query()) {
        let outcome = run(&query, &doc);
        let devices = outcome.result.devices.as_ref().unwrap();
        for (id, device) in devices {
            let kept = device.characteristics.as_ref().map_or(0, |c| c.len());
            prop_assert!(outcome.match_counts[id] >= kept);
        }
    }

    #[test]
    fn filtering_a_result_again_changes_nothing(doc in arb_inventory(), query in arb_query()) {
        let first = run(&query, &doc);
        let second = run(&query, &first.result.to_value());
        prop_assert_eq!(&first.result, &second.result);
        prop_assert_eq!(&first.match_counts, &second.match_counts);
    }

    #[test]
    fn query_case_does_not_matter(doc in arb_inventory(), query in arb_query()) {
        let lower = run(&query.to_lowercase(), &doc);
        let upper = run(&query.to_uppercase(), &doc);
        prop_assert_eq!(lower, upper);
    }
}
