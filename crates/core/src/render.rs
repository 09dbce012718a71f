//! Per-motif render pass.
//!
//! Each frame every motif is drawn in its own translated (and usually
//! rotated) frame, in a fixed z-order: glow halo, main disc, pattern
//! ornamentation, orbital ring, spokes, layered center, drag highlight.
//!
//! The scattered, inner and connecting dots take a fresh random palette color
//! on every frame. The resulting flicker is part of the look, so the draws go
//! through the caller's [`RandomSource`] rather than being cached.

use std::ops::Range;

use glam::DVec2;

use crate::canvas::{DisplayList, Extent, Stroke, Style};
use crate::color::Rgba;
use crate::motif::{Motif, PatternKind};
use crate::palette::Palette;
use crate::prng::RandomSource;
use crate::tuning::Tuning;

const GLOW: Rgba = Rgba::WHITE.with_alpha(30);
const DISC_ALPHA: u8 = 200;
const DISC_ALPHA_DRAGGED: u8 = 180;
const ORBIT_OUTER: Rgba = Rgba::rgb(0xff, 0x98, 0x00);
const CENTER_FILL: Rgba = Rgba::rgb(0xfa, 0xfa, 0xfa);
const SPOKE: Stroke = Stroke {
    color: Rgba::WHITE.with_alpha(150),
    weight: 1.5,
};
const HIGHLIGHT: Rgba = Rgba::WHITE.with_alpha(200);

const SPOKE_COUNT: usize = 8;
const ORBIT_DOTS: usize = 8;
const CONNECTING_DOTS: usize = ORBIT_DOTS * 4;
const SCATTER_DOTS: usize = 20;
const INNER_DOTS: usize = 12;
const SPIRAL_DOTS: usize = 40;
const SPIRAL_TURNS: f64 = 3.0;
const RADIAL_LINES: usize = 12;
const DOTS_PER_LINE: usize = 6;

/// Global animation values shared by every motif in one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub extent: Extent,
    pub pointer: DVec2,
    /// Unbounded rotation accumulator, degrees.
    pub rotation: f64,
    /// Pulse phase in [0, 360], degrees.
    pub pulse_phase: f64,
    pub tuning: &'a Tuning,
}

/// Per-motif animation values derived from the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Pointer proximity in [0, 1].
    pub influence: f64,
    /// Pattern rotation, degrees.
    pub rotation: f64,
    /// Rotation applied to the whole motif frame; zero while dragged.
    pub spin: f64,
    /// Animated diameter.
    pub size: f64,
}

/// Linear map of `value` from `[in_lo, in_hi]` onto `out`, unclamped.
///
/// A degenerate input interval maps everything to `out.start`.
pub fn map_range(value: f64, in_lo: f64, in_hi: f64, out: &Range<f64>) -> f64 {
    let span = in_hi - in_lo;
    if span == 0.0 {
        return out.start;
    }
    out.start + (value - in_lo) / span * (out.end - out.start)
}

/// Inverse-linear pointer falloff: 1 at distance 0, 0 at `falloff` and beyond.
pub fn influence(distance: f64, falloff: f64) -> f64 {
    (1.0 - distance / falloff).clamp(0.0, 1.0)
}

/// `1 + amplitude * sin(phase + offset)`, angles in degrees.
pub fn pulse_factor(phase: f64, offset: f64, amplitude: f64) -> f64 {
    1.0 + amplitude * (phase + offset).to_radians().sin()
}

/// Computes the animation values of `motif` for this frame.
pub fn pose(motif: &Motif, frame: &FrameContext<'_>) -> Pose {
    let t = frame.tuning;
    let influence = influence(motif.position.distance(frame.pointer), t.falloff_radius);
    let rotation = frame.rotation * motif.rotation_speed + motif.rotation_offset;
    let spin = if motif.is_being_dragged {
        0.0
    } else {
        rotation * influence * t.spin_gain
    };
    let vertical = map_range(frame.pointer.y, 0.0, frame.extent.height(), &t.size_band);
    let pulse = pulse_factor(frame.pulse_phase, motif.pulse_offset, t.pulse_amplitude);
    let size = (motif.base_size * vertical * pulse).max(0.0);
    Pose {
        influence,
        rotation,
        spin,
        size,
    }
}

/// Appends the drawing commands for one motif.
pub fn render_motif<R: RandomSource + ?Sized>(
    motif: &Motif,
    frame: &FrameContext<'_>,
    rng: &mut R,
    out: &mut DisplayList,
) {
    let pose = pose(motif, frame);
    let size = pose.size;
    let palette = motif.palette.as_ref();

    out.saved(|out| {
        out.translate(motif.position.x, motif.position.y);
        if !motif.is_being_dragged {
            out.rotate(pose.spin);
        }

        out.disc(size * 1.2, Style::fill(GLOW));
        let disc_alpha = if motif.is_being_dragged {
            DISC_ALPHA_DRAGGED
        } else {
            DISC_ALPHA
        };
        out.disc(size, Style::fill(palette.slot(0).with_alpha(disc_alpha)));

        match motif.pattern {
            PatternKind::Standard => standard_pattern(size, palette, pose.rotation, rng, out),
            PatternKind::Spiral => spiral_pattern(size, palette, pose.rotation, out),
            PatternKind::Radial => radial_pattern(size, palette, pose.rotation, out),
        }

        orbital_ring(size, palette, pose.rotation, frame.pulse_phase, rng, out);
        spokes(size, out);
        center(size, palette, frame.pulse_phase, out);

        if motif.is_being_dragged {
            out.disc(size * 1.1, Style::outline(HIGHLIGHT, 2.0));
        }
    });
}

/// Point at `radius` along `degrees`.
fn polar(degrees: f64, radius: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(cos * radius, sin * radius)
}

/// Diameters `start, start + step, ...` strictly below `end`.
fn ring_diameters(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if step > 0.0 && end > start {
        ((end - start) / step).ceil() as usize
    } else {
        0
    };
    (0..count)
        .map(move |k| start + k as f64 * step)
        .filter(move |d| *d < end)
}

fn dot(out: &mut DisplayList, at: DVec2, diameter: f64, style: Style) {
    out.ellipse(at.x, at.y, diameter, style);
}

fn standard_pattern<R: RandomSource + ?Sized>(
    size: f64,
    palette: &Palette,
    rotation: f64,
    rng: &mut R,
    out: &mut DisplayList,
) {
    let step = 360.0 / SCATTER_DOTS as f64;
    for i in 0..SCATTER_DOTS {
        let angle = i as f64 * step + rotation;
        let r = rng.next_range(size * 0.1, size * 0.35);
        let color = palette.random_color(rng);
        dot(out, polar(angle, r), size * 0.04, Style::fill(color));
    }

    let ring = Style::outline(palette.slot(1), 2.0);
    for d in ring_diameters(size * 0.55, size * 0.9, size * 0.08) {
        out.disc(d, ring);
    }

    let step = 360.0 / INNER_DOTS as f64;
    for i in 0..INNER_DOTS {
        let angle = i as f64 * step + rotation * 1.2;
        let color = palette.random_color(rng);
        dot(
            out,
            polar(angle, size * 0.35),
            size * 0.08,
            Style::fill(color).with_outline(Rgba::WHITE, 1.2),
        );
    }
}

fn spiral_pattern(size: f64, palette: &Palette, rotation: f64, out: &mut DisplayList) {
    for i in 0..SPIRAL_DOTS {
        let progress = i as f64 / SPIRAL_DOTS as f64;
        let angle = progress * 360.0 * SPIRAL_TURNS + rotation;
        let radius = progress * size * 0.4;
        let diameter = size * 0.05 * (1.0 - progress * 0.5);
        dot(out, polar(angle, radius), diameter, Style::fill(palette.slot(i)));
    }

    let ring = Style::outline(palette.slot(3), 1.5);
    for d in ring_diameters(size * 0.5, size * 0.85, size * 0.1) {
        out.disc(d, ring);
    }
}

fn radial_pattern(size: f64, palette: &Palette, rotation: f64, out: &mut DisplayList) {
    let step = 360.0 / RADIAL_LINES as f64;
    for i in 0..RADIAL_LINES {
        let angle = i as f64 * step + rotation;
        for j in 0..DOTS_PER_LINE {
            let progress = (j + 1) as f64 / (DOTS_PER_LINE + 1) as f64;
            let radius = progress * size * 0.4;
            let diameter = size * 0.04 * (1.0 - progress * 0.3);
            dot(out, polar(angle, radius), diameter, Style::fill(palette.slot(i + j)));
        }
    }

    out.disc(size * 0.8, Style::outline(palette.slot(2), 2.0));
}

fn orbital_ring<R: RandomSource + ?Sized>(
    size: f64,
    palette: &Palette,
    rotation: f64,
    pulse_phase: f64,
    rng: &mut R,
    out: &mut DisplayList,
) {
    let orbit = size * 0.6;

    let step = 360.0 / CONNECTING_DOTS as f64;
    for i in 0..CONNECTING_DOTS {
        let angle = i as f64 * step + rotation * 2.0;
        let color = palette.random_color(rng);
        let diameter = size * 0.03 * pulse_factor(angle, pulse_phase, 0.3);
        dot(out, polar(angle, orbit), diameter, Style::fill(color));
    }

    let step = 360.0 / ORBIT_DOTS as f64;
    for i in 0..ORBIT_DOTS {
        let at = polar(i as f64 * step + rotation, orbit);
        let pulse = pulse_factor(pulse_phase, i as f64 * 45.0, 0.1);
        dot(out, at, size * 0.07 * pulse, Style::fill(ORBIT_OUTER));
        dot(out, at, size * 0.05 * pulse, Style::fill(Rgba::BLACK));
        dot(out, at, size * 0.03 * pulse, Style::fill(Rgba::WHITE));
    }
}

fn spokes(size: f64, out: &mut DisplayList) {
    let length = size * 0.4;
    let step = 360.0 / SPOKE_COUNT as f64;
    for i in 0..SPOKE_COUNT {
        out.line(DVec2::ZERO, polar(i as f64 * step, length), SPOKE);
    }
}

fn center(size: f64, palette: &Palette, pulse_phase: f64, out: &mut DisplayList) {
    let pulse = pulse_factor(pulse_phase * 2.0, 0.0, 0.1);
    out.disc(
        size * 0.12 * pulse,
        Style::fill(CENTER_FILL).with_outline(Rgba::WHITE, 1.5),
    );
    out.disc(size * 0.06 * pulse, Style::fill(palette.slot(2)));
}
