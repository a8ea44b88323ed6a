//! Core types for invex-core.
//!
//! This module defines the inventory document model shared by every layer:
//! the [`Inventory`], its [`Device`]s, the three-shaped [`Characteristic`],
//! and the [`FilterOutcome`] produced by the filter engine.
//!
//! Conversion from a parsed JSON document is total. Shapes the model does not
//! recognise degrade to "absent" (a device without characteristics, an
//! inventory without devices) rather than failing the load.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key of a device inside `Inventory.devices`.
pub type DeviceId = String;

/// Number of matching characteristics per device.
pub type MatchCounts = BTreeMap<DeviceId, usize>;

// ---------------------------------------------------------------------------
// Characteristic
// ---------------------------------------------------------------------------

/// A single named property of a device, classified by JSON shape when the
/// document is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Characteristic {
    /// A string, number, boolean or null.
    Scalar(Value),
    /// An object carrying a `values` array of alternatives. Other keys
    /// (`type`, `count`, …) are kept as-is.
    ValueList(Map<String, Value>),
    /// Any other array or object. Only ever matched by name.
    Opaque(Value),
}

impl Characteristic {
    /// The text of a string scalar, `None` for every other shape.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Characteristic::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The alternatives of a value list; empty for every other shape.
    pub fn values(&self) -> &[Value] {
        match self {
            Characteristic::ValueList(map) => map
                .get("values")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Rebuild the original JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Characteristic::Scalar(v) | Characteristic::Opaque(v) => v.clone(),
            Characteristic::ValueList(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Value> for Characteristic {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if matches!(map.get("values"), Some(Value::Array(_))) => {
                Characteristic::ValueList(map)
            }
            Value::Array(_) | Value::Object(_) => Characteristic::Opaque(value),
            scalar => Characteristic::Scalar(scalar),
        }
    }
}

impl Serialize for Characteristic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Characteristic::Scalar(v) | Characteristic::Opaque(v) => v.serialize(serializer),
            Characteristic::ValueList(map) => map.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// Device / Inventory
// ---------------------------------------------------------------------------

/// One entry of `Inventory.devices`.
///
/// `characteristics` is `None` when the key is missing, when it is not a
/// mapping, or when the device entry itself is not a mapping. Other device
/// fields (`physicalCameras`, …) are not modelled; the raw document keeps
/// them for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub characteristics: Option<BTreeMap<String, Characteristic>>,
}

impl From<Value> for Device {
    fn from(value: Value) -> Self {
        let characteristics = match value {
            Value::Object(mut map) => match map.remove("characteristics") {
                Some(Value::Object(chars)) => Some(
                    chars
                        .into_iter()
                        .map(|(name, v)| (name, Characteristic::from(v)))
                        .collect(),
                ),
                _ => None,
            },
            _ => None,
        };
        Device { characteristics }
    }
}

/// The top-level device inventory document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    /// `noOfDevices`, carried through verbatim whatever its JSON type.
    pub no_of_devices: Option<Value>,
    /// `devices`; present-but-malformed yields an empty mapping.
    pub devices: Option<BTreeMap<DeviceId, Device>>,
}

impl Inventory {
    /// An inventory with neither key, as produced by a failed load.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn device_count(&self) -> usize {
        self.devices.as_ref().map_or(0, BTreeMap::len)
    }

    /// Total number of characteristics across all devices.
    pub fn characteristic_count(&self) -> usize {
        self.devices.as_ref().map_or(0, |devices| {
            devices
                .values()
                .filter_map(|d| d.characteristics.as_ref())
                .map(BTreeMap::len)
                .sum()
        })
    }
}

impl From<Value> for Inventory {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Inventory::empty();
        };
        let no_of_devices = map.remove("noOfDevices");
        let devices = map.remove("devices").map(|devices| match devices {
            Value::Object(devices) => devices
                .into_iter()
                .map(|(id, device)| (id, Device::from(device)))
                .collect(),
            _ => BTreeMap::new(),
        });
        Inventory {
            no_of_devices,
            devices,
        }
    }
}

impl From<&Value> for Inventory {
    fn from(value: &Value) -> Self {
        Inventory::from(value.clone())
    }
}

// ---------------------------------------------------------------------------
// Filter output
// ---------------------------------------------------------------------------

/// A device as it appears in a [`FilterResult`]: only the matching
/// characteristics survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<BTreeMap<String, Characteristic>>,
}

/// Structural subset of an [`Inventory`] holding only matched entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterResult {
    #[serde(rename = "noOfDevices", skip_serializing_if = "Option::is_none")]
    pub no_of_devices: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<BTreeMap<DeviceId, FilteredDevice>>,
}

impl FilterResult {
    /// The result as a JSON document, ready for the tree renderer.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Everything one search produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome {
    pub result: FilterResult,
    pub match_counts: MatchCounts,
    pub total_matches: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalars_are_classified_as_scalar() {
        for v in [json!("Red"), json!(12), json!(true), json!(null)] {
            assert!(matches!(Characteristic::from(v), Characteristic::Scalar(_)));
        }
    }

    #[test]
    fn object_with_values_array_is_value_list() {
        let c = Characteristic::from(json!({"type": "byte", "values": ["0", "1"]}));
        assert!(matches!(c, Characteristic::ValueList(_)));
        assert_eq!(c.values(), &[json!("0"), json!("1")]);
    }

    #[test]
    fn object_with_non_array_values_is_opaque() {
        let c = Characteristic::from(json!({"values": "nope"}));
        assert!(matches!(c, Characteristic::Opaque(_)));
        assert!(c.values().is_empty());
    }

    #[test]
    fn bare_array_is_opaque() {
        let c = Characteristic::from(json!(["a", "b"]));
        assert!(matches!(c, Characteristic::Opaque(_)));
    }

    #[test]
    fn as_str_only_for_string_scalars() {
        assert_eq!(Characteristic::from(json!("x")).as_str(), Some("x"));
        assert_eq!(Characteristic::from(json!(3)).as_str(), None);
    }

    #[test]
    fn characteristic_serializes_to_original_shape() {
        let raw = json!({"count": 2, "values": ["Auto", "Manual"]});
        let c = Characteristic::from(raw.clone());
        assert_eq!(serde_json::to_value(&c).unwrap(), raw);
        assert_eq!(c.to_value(), raw);
    }

    #[test]
    fn inventory_from_non_object_is_empty() {
        assert_eq!(Inventory::from(json!([1, 2])), Inventory::empty());
        assert_eq!(Inventory::from(json!({})), Inventory::empty());
    }

    #[test]
    fn malformed_devices_become_empty_mapping() {
        let inv = Inventory::from(json!({"devices": [1, 2, 3]}));
        assert_eq!(inv.devices, Some(BTreeMap::new()));
    }

    #[test]
    fn device_without_characteristics_is_tolerated() {
        let inv = Inventory::from(json!({
            "devices": {"a": {"other": 1}, "b": "not a mapping", "c": {"characteristics": 5}}
        }));
        let devices = inv.devices.unwrap();
        assert_eq!(devices.len(), 3);
        assert!(devices.values().all(|d| d.characteristics.is_none()));
    }

    #[test]
    fn counts_devices_and_characteristics() {
        let inv = Inventory::from(json!({
            "noOfDevices": 2,
            "devices": {
                "0": {"characteristics": {"a": 1, "b": 2}},
                "1": {"characteristics": {"c": 3}}
            }
        }));
        assert_eq!(inv.device_count(), 2);
        assert_eq!(inv.characteristic_count(), 3);
        assert_eq!(inv.no_of_devices, Some(json!(2)));
    }

    #[test]
    fn filter_result_omits_absent_keys() {
        assert_eq!(FilterResult::default().to_value(), json!({}));
    }
}
