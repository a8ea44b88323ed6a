#![allow(unused)]
//! Dumpsys import integration harness.
//!
//! # What this covers
//!
//! - **Conversion**: a report excerpt becomes an inventory document with
//!   provider, device, value-list and physical-camera entries.
//! - **Searchability**: the converted document runs through the filter
//!   engine like any other inventory.
//!
//! # Running
//!
//! ```sh
//! cargo test --test dumpsys_harness
//! ```

mod common;

use common::*;
use invex_core::dumpsys::{parse_report, parse_report_file};
use invex_core::{filter, Inventory, InvexError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;

#[test]
fn report_header_fields() {
    let doc = parse_report(DUMPSYS_REPORT);
    assert_eq!(doc["providerName"], json!("legacy/0 (v2.5, remote)"));
    assert_eq!(doc["noOfDevices"], json!(2));
}

#[test]
fn device_characteristics_are_collected() {
    let doc = parse_report(DUMPSYS_REPORT);
    let chars = &doc["devices"]["0"]["characteristics"];
    assert_eq!(chars["Resource cost"], json!("100"));
    assert_eq!(chars["Facing"], json!("Back"));
    assert_eq!(
        chars["android.control.afAvailableModes"],
        value_list("byte", &["0", "1", "2", "3", "4", "5"])
    );
}

#[test]
fn physical_cameras_are_kept_apart() {
    let doc = parse_report(DUMPSYS_REPORT);
    let device = &doc["devices"]["0"];
    assert_eq!(device["physicalCameraCount"], json!(1));
    assert_eq!(
        device["physicalCameras"][0]["characteristics"]["android.lens.facing"],
        value_list("byte", &["1"])
    );
    assert!(doc["devices"]["1"].get("physicalCameras").is_none());
}

#[test]
fn converted_report_is_searchable() {
    let doc = parse_report(DUMPSYS_REPORT);
    let outcome = filter("3", &Inventory::from(&doc));

    // "3" appears once in each antibanding list and once in afAvailableModes.
    assert_eq!(outcome.match_counts["0"], 2);
    assert_eq!(outcome.match_counts["1"], 1);
    assert_eq!(outcome.total_matches, 3);
}

#[test]
fn empty_report_has_no_devices() {
    assert_eq!(parse_report(""), json!({"noOfDevices": 0, "devices": {}}));
}

#[test]
fn report_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "dumpsys.txt", DUMPSYS_REPORT);
    assert_eq!(parse_report_file(&path).unwrap(), parse_report(DUMPSYS_REPORT));
}

#[test]
fn missing_report_file_is_an_io_error() {
    let err = parse_report_file(Path::new("/nonexistent/dumpsys.txt")).unwrap_err();
    assert!(matches!(err, InvexError::Io { .. }));
}
