//! Sketch variants and their tunable parameters.
//!
//! The three variants share one engine. A [`Tuning`] holds every constant
//! that differs between them (placement spacing, pointer falloff, size
//! band, which interactions exist), and any field can be overridden from a
//! JSON params object.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SketchError;
use crate::layout::LayoutParams;
use crate::params::{param_bool, param_f64, param_range, param_usize};

/// Names of all variants, in increasing order of richness.
const VARIANT_NAMES: &[&str] = &["basic", "interactive", "enhanced"];

/// One of the incremental versions of the sketch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Click anywhere to change palette; no drag, zoom or patterns.
    Basic,
    /// Drag motifs around; resize regenerates the layout.
    Interactive,
    /// Drag, wheel zoom, double-press zoom reset, pattern kinds, pulse.
    #[default]
    Enhanced,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Basic, Variant::Interactive, Variant::Enhanced];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Interactive => "interactive",
            Variant::Enhanced => "enhanced",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, SketchError> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| SketchError::UnknownVariant(name.to_string()))
    }

    pub fn list_names() -> &'static [&'static str] {
        VARIANT_NAMES
    }

    /// One-line summary for listings.
    pub fn description(self) -> &'static str {
        match self {
            Variant::Basic => "press cycles palette, 0.9x spacing, 200px pointer falloff",
            Variant::Interactive => "drag motifs, resize regenerates, 250px pointer falloff",
            Variant::Enhanced => "drag, wheel zoom, double-press reset, spiral/radial patterns",
        }
    }
}

/// Largest accepted `motif_count`.
pub const MAX_MOTIFS: usize = 1_000;
/// Largest accepted `max_attempts`.
pub const MAX_ATTEMPTS: usize = 100_000;
/// Largest accepted `motif_count * max_attempts`.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Every tunable constant of a sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Motifs requested per generation pass.
    pub motif_count: usize,
    /// Diameter range drawn per motif.
    pub size_range: Range<f64>,
    /// Placement margin as a fraction of the motif diameter.
    pub margin_factor: f64,
    /// Minimum centre distance as a fraction of the summed radii.
    pub min_distance_factor: f64,
    /// Position samples tried per motif before it is skipped.
    pub max_attempts: usize,
    /// Pointer distance at which influence reaches zero.
    pub falloff_radius: f64,
    /// Size scale mapped from pointer y (top..bottom).
    pub size_band: Range<f64>,
    /// Multiplier on the pointer-driven spin.
    pub spin_gain: f64,
    /// Rotation added per frame, mapped from pointer x (left..right).
    pub spin_band: Range<f64>,
    /// Pulse scale amplitude.
    pub pulse_amplitude: f64,
    /// Pulse phase advance per frame, degrees.
    pub pulse_step: f64,
    pub drag: bool,
    pub zoom: bool,
    /// Whether motifs get Spiral/Radial pattern kinds and the `R` key.
    pub patterns: bool,
    pub regenerate_on_resize: bool,
    /// Two presses closer than this reset the zoom.
    pub double_press_ms: f64,
    pub zoom_range: Range<f64>,
    /// Zoom change per unit of wheel delta.
    pub zoom_step: f64,
}

impl Tuning {
    /// The preset constants of `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        let shared = Self {
            motif_count: 10,
            size_range: 180.0..320.0,
            margin_factor: 0.7,
            min_distance_factor: 0.8,
            max_attempts: 100,
            falloff_radius: 300.0,
            size_band: 0.8..1.2,
            spin_gain: 1.0,
            spin_band: 0.3..1.8,
            pulse_amplitude: 0.1,
            pulse_step: 2.0,
            drag: true,
            zoom: true,
            patterns: true,
            regenerate_on_resize: false,
            double_press_ms: 300.0,
            zoom_range: 0.5..3.0,
            zoom_step: 0.001,
        };
        match variant {
            Variant::Basic => Self {
                motif_count: 15,
                min_distance_factor: 0.9,
                max_attempts: 200,
                falloff_radius: 200.0,
                size_band: 0.7..1.3,
                drag: false,
                zoom: false,
                patterns: false,
                ..shared
            },
            Variant::Interactive => Self {
                motif_count: 12,
                max_attempts: 150,
                falloff_radius: 250.0,
                size_band: 0.75..1.25,
                zoom: false,
                patterns: false,
                regenerate_on_resize: true,
                ..shared
            },
            Variant::Enhanced => shared,
        }
    }

    /// The preset for `variant` with any keys present in `params` applied.
    ///
    /// Keys of the wrong type are ignored; values of the right type that make
    /// no sense (e.g. a reversed size range) are rejected by [`validate`].
    ///
    /// [`validate`]: Tuning::validate
    pub fn from_json(variant: Variant, params: &Value) -> Result<Self, SketchError> {
        let d = Self::for_variant(variant);
        let tuning = Self {
            motif_count: param_usize(params, "motif_count", d.motif_count),
            size_range: param_range(params, "size_range", d.size_range),
            margin_factor: param_f64(params, "margin_factor", d.margin_factor),
            min_distance_factor: param_f64(params, "min_distance_factor", d.min_distance_factor),
            max_attempts: param_usize(params, "max_attempts", d.max_attempts),
            falloff_radius: param_f64(params, "falloff_radius", d.falloff_radius),
            size_band: param_range(params, "size_band", d.size_band),
            spin_gain: param_f64(params, "spin_gain", d.spin_gain),
            spin_band: param_range(params, "spin_band", d.spin_band),
            pulse_amplitude: param_f64(params, "pulse_amplitude", d.pulse_amplitude),
            pulse_step: param_f64(params, "pulse_step", d.pulse_step),
            drag: param_bool(params, "drag", d.drag),
            zoom: param_bool(params, "zoom", d.zoom),
            patterns: param_bool(params, "patterns", d.patterns),
            regenerate_on_resize: param_bool(params, "regenerate_on_resize", d.regenerate_on_resize),
            double_press_ms: param_f64(params, "double_press_ms", d.double_press_ms),
            zoom_range: param_range(params, "zoom_range", d.zoom_range),
            zoom_step: param_f64(params, "zoom_step", d.zoom_step),
        };
        tuning.validate()?;
        Ok(tuning)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), SketchError> {
        fn invalid(name: &str, reason: &str) -> SketchError {
            SketchError::InvalidParam {
                name: name.to_string(),
                reason: reason.to_string(),
            }
        }
        if self.motif_count > MAX_MOTIFS {
            return Err(invalid("motif_count", &format!("must be at most {MAX_MOTIFS}")));
        }
        if self.max_attempts > MAX_ATTEMPTS {
            return Err(invalid("max_attempts", &format!("must be at most {MAX_ATTEMPTS}")));
        }
        match self.motif_count.checked_mul(self.max_attempts) {
            Some(samples) if samples <= MAX_SAMPLES => {}
            _ => {
                return Err(invalid(
                    "max_attempts",
                    &format!("motif_count * max_attempts must be at most {MAX_SAMPLES}"),
                ))
            }
        }
        let finite_non_negative = [
            ("margin_factor", self.margin_factor),
            ("min_distance_factor", self.min_distance_factor),
            ("spin_gain", self.spin_gain),
            ("pulse_amplitude", self.pulse_amplitude),
            ("double_press_ms", self.double_press_ms),
            ("zoom_step", self.zoom_step),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, "must be finite and non-negative"));
            }
        }
        if !self.pulse_step.is_finite() {
            return Err(invalid("pulse_step", "must be finite"));
        }
        if !self.falloff_radius.is_finite() || self.falloff_radius <= 0.0 {
            return Err(invalid("falloff_radius", "must be finite and positive"));
        }
        let ordered = [
            ("size_range", &self.size_range),
            ("size_band", &self.size_band),
            ("spin_band", &self.spin_band),
            ("zoom_range", &self.zoom_range),
        ];
        for (name, range) in ordered {
            if !range.start.is_finite() || !range.end.is_finite() {
                return Err(invalid(name, "bounds must be finite"));
            }
            if range.start > range.end {
                return Err(invalid(name, "start must not exceed end"));
            }
        }
        if self.size_range.start <= 0.0 {
            return Err(invalid("size_range", "sizes must be positive"));
        }
        if self.zoom_range.start <= 0.0 || self.zoom_range.start > 1.0 || self.zoom_range.end < 1.0 {
            return Err(invalid("zoom_range", "must be positive and include 1.0"));
        }
        Ok(())
    }

    /// The subset of the tuning the layout generator reads.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            count: self.motif_count,
            size_range: self.size_range.clone(),
            margin_factor: self.margin_factor,
            min_distance_factor: self.min_distance_factor,
            max_attempts: self.max_attempts,
            patterns: self.patterns,
        }
    }

    /// Current values as a flat JSON object, in the shape `from_json` reads.
    pub fn to_params(&self) -> Value {
        json!({
            "motif_count": self.motif_count,
            "size_range": [self.size_range.start, self.size_range.end],
            "margin_factor": self.margin_factor,
            "min_distance_factor": self.min_distance_factor,
            "max_attempts": self.max_attempts,
            "falloff_radius": self.falloff_radius,
            "size_band": [self.size_band.start, self.size_band.end],
            "spin_gain": self.spin_gain,
            "spin_band": [self.spin_band.start, self.spin_band.end],
            "pulse_amplitude": self.pulse_amplitude,
            "pulse_step": self.pulse_step,
            "drag": self.drag,
            "zoom": self.zoom,
            "patterns": self.patterns,
            "regenerate_on_resize": self.regenerate_on_resize,
            "double_press_ms": self.double_press_ms,
            "zoom_range": [self.zoom_range.start, self.zoom_range.end],
            "zoom_step": self.zoom_step,
        })
    }
}
