//! Test fixtures.
//!
//! Mappings with hand-checkable colours, and helpers that write their
//! persisted records to disk for the command-line tests.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use tfkit::colormaps::{Colormap, LinearColormap, OpacityMap};

/// Red at 0, green at 0.5, blue at 1.
pub fn rgb_ramp() -> LinearColormap {
    let mut colormap = LinearColormap::default();
    assert!(colormap.set_control_points(
        vec![0.0, 0.5, 1.0],
        vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    ));
    colormap
}

pub fn rgb_colormap() -> Colormap {
    Colormap::from(rgb_ramp())
}

/// A VSUP record as an editor would save it.
pub fn vsup_record() -> Value {
    json!({
        "type": "vsup",
        "preset_name": "Viridis (matplotlib)",
        "color_control_points": [0.0, 0.3, 1.0],
        "color_points": [[0.2, 0.0, 0.3], [0.1, 0.6, 0.5], [1.0, 0.9, 0.1]],
        "depth": 3,
        "flip_y": true,
        "continuous": false,
        "fading_color": "rgb(240, 240, 240)"
    })
}

/// Opacity 0 below 0.2, rising to 1 at the top.
pub fn step_opacity() -> OpacityMap {
    OpacityMap::new(vec![0.0, 0.2, 1.0], vec![0.0, 0.0, 1.0])
}

/// Write `record` as pretty JSON under `dir`.
pub fn write_record(dir: &Path, file_name: &str, record: &Value) -> std::io::Result<PathBuf> {
    let path = dir.join(file_name);
    let text = serde_json::to_string_pretty(record).map_err(std::io::Error::other)?;
    std::fs::write(&path, text)?;
    Ok(path)
}
