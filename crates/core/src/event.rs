//! Host-independent input events and the outcomes they produce.

use serde::{Deserialize, Serialize};

/// One input event, as delivered by a front-end or read from a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove {
        x: f64,
        y: f64,
    },
    /// `time_ms` is read from a monotonic clock and only compared with
    /// earlier presses.
    PointerDown {
        x: f64,
        y: f64,
        time_ms: f64,
    },
    PointerUp,
    Wheel {
        delta: f64,
    },
    /// The key as typed, e.g. `" "`, `"c"` or `"R"`.
    Key {
        key: String,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

impl InputEvent {
    pub fn key(key: impl Into<String>) -> Self {
        InputEvent::Key { key: key.into() }
    }
}

/// What handling an event changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    None,
    DragStarted(usize),
    DragEnded(usize),
    /// Name of the now active palette.
    PaletteCycled(String),
    /// Number of motifs placed by the new layout.
    Regenerated(usize),
    PatternsRandomized,
    ZoomChanged(f64),
    ZoomReset,
    Resized,
}
