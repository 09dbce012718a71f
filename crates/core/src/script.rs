//! Reproducible description of a headless sketch run.
//!
//! A [`Script`] captures everything needed to replay a run: variant, surface
//! size, seed, parameter overrides, frame count and the input events fed in
//! between frames. Two identical scripts produce identical display lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canvas::{DisplayList, Extent};
use crate::error::SketchError;
use crate::event::{Action, InputEvent};
use crate::sketch::Sketch;
use crate::tuning::{Tuning, Variant};

/// An input event delivered just before frame `frame` (0-based) is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub frame: usize,
    pub event: InputEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub variant: Variant,
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    /// Tuning overrides, in the shape [`Tuning::from_json`] reads.
    #[serde(default = "empty_params")]
    pub params: Value,
    /// Name of the palette active from the start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    #[serde(default = "one")]
    pub frames: usize,
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

fn one() -> usize {
    1
}

impl Script {
    /// One frame of `variant` with preset tuning and no events.
    pub fn new(variant: Variant, width: f64, height: f64, seed: u64) -> Self {
        Self {
            variant,
            width,
            height,
            seed,
            params: empty_params(),
            palette: None,
            frames: 1,
            events: Vec::new(),
        }
    }

    /// Checks dimensions, the frame count and event scheduling.
    pub fn validate(&self) -> Result<(), SketchError> {
        self.extent()?;
        if self.frames == 0 {
            return Err(SketchError::InvalidParam {
                name: "frames".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(late) = self.events.iter().find(|e| e.frame >= self.frames) {
            return Err(SketchError::InvalidParam {
                name: "events".to_string(),
                reason: format!(
                    "event scheduled before frame {} but only {} frames run",
                    late.frame, self.frames
                ),
            });
        }
        if !self.params.is_object() {
            return Err(SketchError::InvalidParam {
                name: "params".to_string(),
                reason: "must be a JSON object".to_string(),
            });
        }
        Ok(())
    }

    pub fn extent(&self) -> Result<Extent, SketchError> {
        Extent::new(self.width, self.height)
    }

    /// Builds the sketch described by the script, before any frame runs.
    pub fn build(&self) -> Result<Sketch, SketchError> {
        self.validate()?;
        let tuning = Tuning::from_json(self.variant, &self.params)?;
        let mut sketch = Sketch::new(self.variant, self.extent()?, tuning, self.seed)?;
        if let Some(name) = &self.palette {
            sketch.select_palette(name)?;
        }
        Ok(sketch)
    }

    /// Runs every frame, leaving the last one in `out`.
    ///
    /// Returns the finished sketch and the actions its events produced.
    pub fn run(&self, out: &mut DisplayList) -> Result<(Sketch, Vec<Action>), SketchError> {
        let mut sketch = self.build()?;
        let mut actions = Vec::with_capacity(self.events.len());
        for frame in 0..self.frames {
            for scheduled in self.events.iter().filter(|e| e.frame == frame) {
                actions.push(sketch.handle(scheduled.event.clone()));
            }
            sketch.frame(out);
        }
        Ok((sketch, actions))
    }
}
