//! Dumpsys import — turns an Android `dumpsys media.camera` report into an
//! inventory document.
//!
//! Recognised lines (leading whitespace ignored):
//!
//! | Line | Effect |
//! |------|--------|
//! | `== Camera Provider HAL <name> static info: <N> devices: ==` | `providerName`, adds `<N>` to `noOfDevices` |
//! | `== Camera HAL device …/<id> (…) static information: ==` | starts device `<id>` |
//! | `API2 camera characteristics:` | following keys go to the device |
//! | `Physical camera <id> characteristics:` | following keys go to a new `physicalCameras` entry |
//! | `<key> (<tag>): <type>[<count>]` then `[a b c ]` | value-list characteristic |
//! | `Key: value` | string characteristic |
//!
//! Everything else is skipped. The output follows the schema the filter
//! engine reads, so a report can be searched directly.
//!
//! A report with several providers also gets a `providers` list of
//! `{providerName, noOfDevices}`. When two providers expose the same numeric
//! id, the later device is keyed by its full HAL name
//! (`device@3.5/external/0`) instead.
//!
//! A `[` that is never closed ends at the next header or section line, so a
//! truncated list does not swallow the devices after it.

use crate::error::InvexError;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::LazyLock;

static PROVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^==.*camera provider hal (?P<name>.*?) static info.*\s(?P<count>\d+) devices.*==$",
    )
    .expect("provider pattern")
});

static DEVICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^==.*camera hal device\s+(?P<hal>\S*/(?P<id>\d+)).*static information.*==$",
    )
        .expect("device pattern")
});

static SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)camera\s+(?P<camera>.*?)\s*characteristics:$").expect("section pattern")
});

static ARRAY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[\w.]+)(?:\s*\([^)]*\))?:\s*(?P<type>\w+)\[(?P<count>\d+)\]$")
        .expect("array key pattern")
});

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z][\w ]*?):\s*(?P<value>\S.*)$").expect("key/value pattern")
});

/// Parse report text into an inventory document. Never fails; an
/// unrecognisable report yields `{"noOfDevices": 0, "devices": {}}`.
pub fn parse_report(text: &str) -> Value {
    let mut report = ReportBuilder::default();
    for line in text.lines() {
        report.feed(line);
    }
    report.finish()
}

/// Read and parse a report file.
pub fn parse_report_file(path: &Path) -> Result<Value, InvexError> {
    let text = std::fs::read_to_string(path).map_err(|e| InvexError::io(path, e))?;
    let doc = parse_report(&text);
    tracing::debug!(
        path = %path.display(),
        devices = doc["devices"].as_object().map_or(0, Map::len),
        "dumpsys report parsed"
    );
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ReportBuilder {
    /// `(name, declared device count)` per provider header, in order.
    providers: Vec<(String, u64)>,
    devices: Vec<DeviceBuilder>,
    /// Value-list key waiting for its `[…]` line.
    pending: Option<PendingValues>,
}

struct PendingValues {
    key: String,
    /// Inside a bracket that has not been closed yet.
    open: bool,
}

struct DeviceBuilder {
    id: String,
    hal_name: String,
    characteristics: Map<String, Value>,
    physical: Vec<PhysicalCamera>,
    in_physical: bool,
}

struct PhysicalCamera {
    id: String,
    characteristics: Map<String, Value>,
}

impl DeviceBuilder {
    fn new(id: String, hal_name: String) -> Self {
        Self {
            id,
            hal_name,
            characteristics: Map::new(),
            physical: Vec::new(),
            in_physical: false,
        }
    }

    /// The characteristics map currently being filled.
    fn target(&mut self) -> &mut Map<String, Value> {
        match self.physical.last_mut() {
            Some(camera) if self.in_physical => &mut camera.characteristics,
            _ => &mut self.characteristics,
        }
    }

    fn into_value(self) -> Value {
        let mut device = Map::new();
        device.insert(
            "characteristics".to_string(),
            Value::Object(self.characteristics),
        );
        if !self.physical.is_empty() {
            device.insert("physicalCameraCount".to_string(), json!(self.physical.len()));
            let cameras = self
                .physical
                .into_iter()
                .map(|c| json!({"physicalCameraId": c.id, "characteristics": c.characteristics}))
                .collect();
            device.insert("physicalCameras".to_string(), Value::Array(cameras));
        }
        Value::Object(device)
    }
}

impl ReportBuilder {
    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(pending) = self.pending.take() {
            if pending.open && starts_block(line) {
                tracing::warn!(key = %pending.key, "value list never closed");
            } else {
                let body = if pending.open {
                    Some(line)
                } else {
                    line.strip_prefix('[')
                };
                if let Some(body) = body {
                    self.push_values(pending, body);
                    return;
                }
            }
            // No (more) values; fall through and parse this line.
        }

        if let Some(caps) = PROVIDER.captures(line) {
            let count = caps["count"].parse().unwrap_or(0);
            self.providers.push((caps["name"].trim().to_string(), count));
            return;
        }

        if let Some(caps) = DEVICE.captures(line) {
            self.devices.push(DeviceBuilder::new(
                caps["id"].to_string(),
                caps["hal"].to_string(),
            ));
            return;
        }

        let Some(device) = self.devices.last_mut() else {
            return;
        };

        if let Some(caps) = SECTION.captures(line) {
            let camera = caps["camera"].trim();
            if camera.is_empty() {
                device.in_physical = false;
            } else {
                device.physical.push(PhysicalCamera {
                    id: camera.to_string(),
                    characteristics: Map::new(),
                });
                device.in_physical = true;
            }
            return;
        }

        if let Some(caps) = ARRAY_KEY.captures(line) {
            let key = caps["key"].to_string();
            let count: u64 = caps["count"].parse().unwrap_or(0);
            device.target().insert(
                key.clone(),
                json!({"type": &caps["type"], "count": count, "values": []}),
            );
            self.pending = Some(PendingValues { key, open: false });
            return;
        }

        if let Some(caps) = KEY_VALUE.captures(line) {
            device.target().insert(
                caps["key"].trim().to_string(),
                Value::String(caps["value"].trim().to_string()),
            );
        }
    }

    fn push_values(&mut self, mut pending: PendingValues, body: &str) {
        let (body, closed) = match body.find(']') {
            Some(end) => (&body[..end], true),
            None => (body, false),
        };

        if let Some(device) = self.devices.last_mut() {
            if let Some(Value::Array(values)) = device
                .target()
                .get_mut(&pending.key)
                .and_then(|c| c.get_mut("values"))
            {
                values.extend(body.split_whitespace().map(|t| Value::String(t.to_string())));
            }
        }

        if !closed {
            pending.open = true;
            self.pending = Some(pending);
        }
    }

    fn finish(self) -> Value {
        let device_total = self.devices.len() as u64;
        let mut devices = Map::new();
        for device in self.devices {
            let key = if devices.contains_key(&device.id) {
                tracing::debug!(id = %device.id, hal = %device.hal_name, "device id reused");
                device.hal_name.clone()
            } else {
                device.id.clone()
            };
            devices.insert(key, device.into_value());
        }

        let mut doc = Map::new();
        if let Some((name, _)) = self.providers.first() {
            doc.insert("providerName".to_string(), Value::String(name.clone()));
        }
        if self.providers.len() > 1 {
            let providers = self
                .providers
                .iter()
                .map(|(name, count)| json!({"providerName": name, "noOfDevices": count}))
                .collect();
            doc.insert("providers".to_string(), Value::Array(providers));
        }
        let declared: u64 = if self.providers.is_empty() {
            device_total
        } else {
            self.providers.iter().map(|(_, count)| count).sum()
        };
        doc.insert("noOfDevices".to_string(), json!(declared));
        doc.insert("devices".to_string(), Value::Object(devices));
        Value::Object(doc)
    }
}

/// Lines that cannot belong to a value list.
fn starts_block(line: &str) -> bool {
    line.starts_with("==") || SECTION.is_match(line) || ARRAY_KEY.is_match(line)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
