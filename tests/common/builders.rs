//! Test builders — ergonomic constructors for inventory documents.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// InventoryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for inventory JSON documents.
///
/// # Example
///
/// ```rust
/// let doc = InventoryBuilder::new()
///     .device("0", json!({"Facing": "Back"}))
///     .device("1", json!({"Facing": "Front"}))
///     .build();
/// ```
#[derive(Default)]
pub struct InventoryBuilder {
    no_of_devices: Option<Value>,
    devices: Map<String, Value>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device whose `characteristics` mapping is `characteristics`.
    pub fn device(self, id: impl Into<String>, characteristics: Value) -> Self {
        self.raw_device(id, json!({ "characteristics": characteristics }))
    }

    /// Add a device entry verbatim, e.g. one without characteristics.
    pub fn raw_device(mut self, id: impl Into<String>, entry: Value) -> Self {
        self.devices.insert(id.into(), entry);
        self
    }

    /// Override `noOfDevices`; defaults to the number of devices added.
    pub fn no_of_devices(mut self, value: Value) -> Self {
        self.no_of_devices = Some(value);
        self
    }

    pub fn build(self) -> Value {
        let count = self
            .no_of_devices
            .unwrap_or_else(|| json!(self.devices.len()));
        json!({ "noOfDevices": count, "devices": self.devices })
    }
}

/// A value-list characteristic: `{"type", "count", "values"}`.
pub fn value_list(ty: &str, values: &[&str]) -> Value {
    json!({ "type": ty, "count": values.len(), "values": values })
}
