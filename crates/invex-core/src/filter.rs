//! Filter engine — narrows an [`Inventory`] to the characteristics that match
//! a search term.
//!
//! # Match rules
//!
//! Matching is a case-insensitive substring test. For each characteristic:
//!
//! 1. the **name** matches, or the value is a **string** scalar that matches
//!    → included, one match;
//! 2. otherwise a **value list** is scanned → included if any element matches,
//!    one match *per matching element*;
//! 3. otherwise it is dropped.
//!
//! Numbers and booleans never match by value; a value-list element is tested
//! through its string form (`12`, `true`, …). Included values are copied
//! unchanged, and every device in the input gets a count, zero or not.
//!
//! An empty query matches nothing.

use crate::types::{
    Characteristic, Device, FilterOutcome, FilterResult, FilteredDevice, Inventory, MatchCounts,
};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Run `query` over `inventory`.
///
/// Pure and total: the inventory is only borrowed, and malformed or missing
/// parts produce zero matches instead of an error.
pub fn filter(query: &str, inventory: &Inventory) -> FilterOutcome {
    let needle = Needle::new(query);

    let Some(devices) = &inventory.devices else {
        return FilterOutcome {
            result: FilterResult {
                no_of_devices: inventory.no_of_devices.clone(),
                devices: None,
            },
            ..FilterOutcome::default()
        };
    };

    let (filtered, match_counts) = devices.iter().fold(
        (BTreeMap::new(), MatchCounts::new()),
        |(mut filtered, mut counts), (id, device)| {
            let (entry, hits) = filter_device(&needle, device);
            filtered.insert(id.clone(), entry);
            counts.insert(id.clone(), hits);
            (filtered, counts)
        },
    );
    let total_matches = match_counts.values().sum();

    FilterOutcome {
        result: FilterResult {
            no_of_devices: inventory.no_of_devices.clone(),
            devices: Some(filtered),
        },
        match_counts,
        total_matches,
    }
}

fn filter_device(needle: &Needle, device: &Device) -> (FilteredDevice, usize) {
    let Some(characteristics) = &device.characteristics else {
        return (FilteredDevice::default(), 0);
    };

    let (kept, hits) = characteristics
        .iter()
        .map(|(name, value)| (name, value, characteristic_hits(needle, name, value)))
        .filter(|(_, _, hits)| *hits > 0)
        .fold(
            (BTreeMap::new(), 0),
            |(mut kept, total), (name, value, hits)| {
                kept.insert(name.clone(), value.clone());
                (kept, total + hits)
            },
        );

    (
        FilteredDevice {
            characteristics: Some(kept),
        },
        hits,
    )
}

/// Number of matches a single characteristic contributes.
fn characteristic_hits(needle: &Needle, name: &str, value: &Characteristic) -> usize {
    let key_match = needle.matches(name);
    let value_match = value.as_str().is_some_and(|s| needle.matches(s));
    if key_match || value_match {
        return 1;
    }

    match value {
        Characteristic::ValueList(_) => value
            .values()
            .iter()
            .filter(|element| needle.matches(&element_text(element)))
            .count(),
        Characteristic::Scalar(_) | Characteristic::Opaque(_) => 0,
    }
}

/// String form of a value-list element.
fn element_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// The lowercased query; `None` for the empty query, which never matches.
struct Needle(Option<String>);

impl Needle {
    fn new(query: &str) -> Self {
        if query.is_empty() {
            Needle(None)
        } else {
            Needle(Some(query.to_lowercase()))
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        match &self.0 {
            Some(needle) => haystack.to_lowercase().contains(needle.as_str()),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
