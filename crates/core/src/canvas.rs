//! Canvas extent and the display-list drawing model.
//!
//! The sketch never touches pixels. Each frame it records [`DrawCommand`]s into
//! a [`DisplayList`], which a backend replays: the CPU rasterizer in
//! `wheels-raster`, or the browser's canvas 2D context in `wheels-wasm`.
//! Commands use a transform stack (`Save`/`Restore`, `Translate`, `Rotate`,
//! `Scale`) in the manner of a 2D canvas API; angles are degrees.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::SketchError;

/// Width and height of the drawing surface, in canvas units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    width: f64,
    height: f64,
}

impl Extent {
    /// Returns `SketchError::InvalidDimensions` unless both sides are finite
    /// and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, SketchError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(SketchError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Outline color and line width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub weight: f64,
}

/// How a closed shape is painted. Both parts are optional; with neither the
/// shape is invisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
}

impl Style {
    /// Fill only.
    pub fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only.
    pub fn outline(color: Rgba, weight: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(Stroke { color, weight }),
        }
    }

    /// Returns this style with an outline added.
    pub fn with_outline(mut self, color: Rgba, weight: f64) -> Self {
        self.stroke = Some(Stroke { color, weight });
        self
    }
}

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Paints the whole surface, ignoring the transform.
    Background { color: Rgba },
    /// Pushes the current transform.
    Save,
    /// Pops the transform pushed by the matching `Save`.
    Restore,
    Translate { x: f64, y: f64 },
    /// Rotation in degrees, clockwise on a y-down surface.
    Rotate { degrees: f64 },
    /// Uniform scale.
    Scale { factor: f64 },
    /// Circle of the given diameter centred on `(x, y)`.
    Ellipse {
        x: f64,
        y: f64,
        diameter: f64,
        style: Style,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        size: f64,
        text: String,
        color: Rgba,
        align: TextAlign,
    },
}

/// Ordered drawing commands for one frame, bound to the surface extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    extent: Extent,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            commands: Vec::new(),
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clears and rebinds to a new extent.
    pub fn reset(&mut self, extent: Extent) {
        self.extent = extent;
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn background(&mut self, color: Rgba) {
        self.push(DrawCommand::Background { color });
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate { x, y });
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.push(DrawCommand::Rotate { degrees });
    }

    pub fn scale(&mut self, factor: f64) {
        self.push(DrawCommand::Scale { factor });
    }

    pub fn ellipse(&mut self, x: f64, y: f64, diameter: f64, style: Style) {
        self.push(DrawCommand::Ellipse {
            x,
            y,
            diameter,
            style,
        });
    }

    /// Circle centred on the current origin.
    pub fn disc(&mut self, diameter: f64, style: Style) {
        self.ellipse(0.0, 0.0, diameter, style);
    }

    pub fn line(&mut self, from: DVec2, to: DVec2, stroke: Stroke) {
        self.push(DrawCommand::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            stroke,
        });
    }

    pub fn text(&mut self, at: DVec2, size: f64, text: impl Into<String>, color: Rgba, align: TextAlign) {
        self.push(DrawCommand::Text {
            x: at.x,
            y: at.y,
            size,
            text: text.into(),
            color,
            align,
        });
    }

    /// Runs `f` between a `Save` and its matching `Restore`.
    pub fn saved(&mut self, f: impl FnOnce(&mut Self)) {
        self.push(DrawCommand::Save);
        f(self);
        self.push(DrawCommand::Restore);
    }

    /// True when every `Restore` pops a prior `Save` and none are left open.
    pub fn is_balanced(&self) -> bool {
        let mut depth: usize = 0;
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                _ => {}
            }
        }
        depth == 0
    }
}
