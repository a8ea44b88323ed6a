//! Static inventories and reports used across harnesses.

use super::builders::{value_list, InventoryBuilder};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Three devices: two with characteristics, one without.
///
/// | query   | matches                                          |
/// |---------|--------------------------------------------------|
/// | `red`   | `Color` on 0 and 1                               |
/// | `facing`| `Facing` on 0 and 1                              |
/// | `1`     | value-list elements on 0 (`1`) and 1 (`1`)       |
/// | `90`    | nothing (numbers never match by value)           |
pub fn sample_inventory() -> Value {
    InventoryBuilder::new()
        .device(
            "0",
            json!({
                "Facing": "Back",
                "Color": "Red",
                "android.control.aeAvailableModes": value_list("byte", &["0", "1", "2", "3"]),
                "android.sensor.orientation": 90,
                "android.flash.info.available": true,
                "android.lens.info.availableFocalLengths": [4.38]
            }),
        )
        .device(
            "1",
            json!({
                "Facing": "Front",
                "Color": "red-ish",
                "android.control.aeAvailableModes": value_list("byte", &["0", "1"])
            }),
        )
        .raw_device("2", json!({ "physicalCameraCount": 0 }))
        .build()
}

/// A two-device `dumpsys media.camera` excerpt with one physical camera.
pub const DUMPSYS_REPORT: &str = r#"
== Camera Provider HAL legacy/0 (v2.5, remote) static info: 2 devices: ==
== Camera HAL device device@3.5/legacy/0 (v3.5) static information: ==
  Resource cost: 100
  API1 info:
    Has a flash unit: true
    Facing: Back
  API2 camera characteristics:
    android.control.aeAvailableAntibandingModes (10012): byte[4]
        [0 1 2 3 ]
    android.control.afAvailableModes (10013): byte[6]
        [0 1 2 3
         4 5 ]
  Physical camera 5 characteristics:
    android.lens.facing (80005): byte[1]
        [1 ]
== Camera HAL device device@3.5/legacy/1 (v3.5) static information: ==
  Facing: Front
  API2 camera characteristics:
    android.control.aeAvailableAntibandingModes (10012): byte[2]
        [0 3 ]
"#;

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
