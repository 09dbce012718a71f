//! Pointer interaction: press, drag, release, wheel zoom, double-press reset.
//!
//! Two pointer states, `Idle` and `Dragging`. A press inside a motif (first
//! hit in generation order) starts a drag; moves make the motif follow the
//! pointer at the grab offset; release returns to `Idle`. Zoom and the
//! double-press reset only exist when the tuning enables them.

use glam::DVec2;

use crate::motif::Motif;
use crate::tuning::Tuning;

/// A motif held by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Index of the motif in generation order.
    pub index: usize,
    /// Pointer position at press time.
    pub grab_pointer: DVec2,
    /// Motif position at press time.
    pub origin: DVec2,
}

impl Drag {
    /// Where the motif sits for the given pointer position.
    ///
    /// Written as origin plus pointer travel so an unmoved pointer puts the
    /// motif back on exactly its original coordinates.
    pub fn follow(&self, pointer: DVec2) -> DVec2 {
        self.origin + (pointer - self.grab_pointer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// What a press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// Second press inside the double-press window; zoom is back to 1.0.
    ZoomReset,
    /// The motif at this index is now being dragged.
    DragStarted(usize),
    /// Drag is disabled, so the press asks for the next palette.
    PaletteRequested,
    /// Missed every motif.
    Ignored,
}

/// Pointer state plus zoom level and the last press time.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    state: PointerState,
    zoom: f64,
    last_press_ms: Option<f64>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            state: PointerState::Idle,
            zoom: 1.0,
            last_press_ms: None,
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Index of the dragged motif, if any.
    pub fn dragging(&self) -> Option<usize> {
        match self.state {
            PointerState::Dragging(drag) => Some(drag.index),
            PointerState::Idle => None,
        }
    }

    /// Handles a pointer press at `pointer`, `time_ms` on a monotonic clock.
    pub fn press(
        &mut self,
        pointer: DVec2,
        time_ms: f64,
        motifs: &mut [Motif],
        tuning: &Tuning,
    ) -> Press {
        if tuning.zoom {
            let double = self.last_press_ms.is_some_and(|last| {
                let elapsed = time_ms - last;
                elapsed >= 0.0 && elapsed < tuning.double_press_ms
            });
            if double {
                self.zoom = 1.0;
                self.last_press_ms = None;
                return Press::ZoomReset;
            }
            self.last_press_ms = Some(time_ms);
        }

        if !tuning.drag {
            return Press::PaletteRequested;
        }

        // A press without a release in between drops the old drag.
        self.release(motifs);

        match motifs.iter().position(|m| m.contains(pointer)) {
            Some(index) => {
                let motif = &mut motifs[index];
                motif.is_being_dragged = true;
                self.state = PointerState::Dragging(Drag {
                    index,
                    grab_pointer: pointer,
                    origin: motif.position,
                });
                Press::DragStarted(index)
            }
            None => Press::Ignored,
        }
    }

    /// Moves the dragged motif, if any, to follow `pointer`.
    pub fn follow(&self, pointer: DVec2, motifs: &mut [Motif]) {
        if let PointerState::Dragging(drag) = self.state {
            if let Some(motif) = motifs.get_mut(drag.index) {
                motif.position = drag.follow(pointer);
            }
        }
    }

    /// Ends any drag; returns the index of the released motif.
    pub fn release(&mut self, motifs: &mut [Motif]) -> Option<usize> {
        let PointerState::Dragging(drag) = self.state else {
            return None;
        };
        if let Some(motif) = motifs.get_mut(drag.index) {
            motif.is_being_dragged = false;
        }
        self.state = PointerState::Idle;
        Some(drag.index)
    }

    /// Forgets the drag without touching motifs. Used when the motif set is
    /// replaced.
    pub fn cancel_drag(&mut self) {
        self.state = PointerState::Idle;
    }

    /// Applies a wheel delta; returns the new zoom, or `None` when zoom is
    /// disabled.
    pub fn wheel(&mut self, delta: f64, tuning: &Tuning) -> Option<f64> {
        if !tuning.zoom || !delta.is_finite() {
            return None;
        }
        self.zoom = (self.zoom + delta * tuning.zoom_step)
            .clamp(tuning.zoom_range.start, tuning.zoom_range.end);
        Some(self.zoom)
    }
}
