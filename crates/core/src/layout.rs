//! Non-overlapping motif placement by greedy rejection sampling.
//!
//! Each requested motif gets a random diameter, then up to `max_attempts`
//! uniformly sampled positions inside the margin-inset canvas. The first
//! position that keeps clear of every motif already accepted in this pass
//! wins; if none does, the motif is skipped. There is no backtracking, and
//! the attempt cap bounds the work, so generation always terminates.

use std::ops::Range;
use std::sync::Arc;

use glam::DVec2;
use serde::Serialize;

use crate::canvas::Extent;
use crate::motif::Motif;
use crate::palette::Palette;
use crate::prng::RandomSource;

/// Inputs of one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub count: usize,
    /// Diameter range. An empty range always yields `start`.
    pub size_range: Range<f64>,
    /// Margin from each canvas edge, as a fraction of the diameter.
    pub margin_factor: f64,
    /// Minimum centre distance, as a fraction of the summed radii.
    pub min_distance_factor: f64,
    pub max_attempts: usize,
    /// Draw a random pattern kind per motif.
    pub patterns: bool,
}

/// Result of one generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub motifs: Vec<Motif>,
    pub requested: usize,
    /// Motifs given up on after exhausting their attempts.
    pub skipped: usize,
    /// Position samples rejected across the whole pass.
    pub rejected_samples: usize,
}

/// Smallest allowed distance between the centres of two motifs.
pub fn min_distance(size_a: f64, size_b: f64, factor: f64) -> f64 {
    (size_a * 0.5 + size_b * 0.5) * factor
}

/// True when every pair of motifs respects [`min_distance`].
pub fn is_well_spaced(motifs: &[Motif], factor: f64) -> bool {
    motifs.iter().enumerate().all(|(i, a)| {
        motifs[i + 1..].iter().all(|b| {
            a.position.distance(b.position) >= min_distance(a.base_size, b.base_size, factor)
        })
    })
}

/// Runs one generation pass. Every motif receives `palette`.
pub fn generate<R: RandomSource + ?Sized>(
    extent: Extent,
    params: &LayoutParams,
    palette: &Arc<Palette>,
    rng: &mut R,
) -> Layout {
    let mut motifs: Vec<Motif> = Vec::new();
    let mut skipped = 0;
    let mut rejected_samples = 0;

    for _ in 0..params.count {
        let size = rng.next_range(params.size_range.start, params.size_range.end);
        let margin = size * params.margin_factor;

        let mut placed = None;
        for _ in 0..params.max_attempts {
            let x = sample_axis(rng, margin, extent.width());
            let y = sample_axis(rng, margin, extent.height());
            let candidate = match (x, y) {
                (Some(x), Some(y)) => DVec2::new(x, y),
                _ => {
                    rejected_samples += 1;
                    continue;
                }
            };
            let clear = motifs.iter().all(|m| {
                candidate.distance(m.position)
                    >= min_distance(size, m.base_size, params.min_distance_factor)
            });
            if clear {
                placed = Some(candidate);
                break;
            }
            rejected_samples += 1;
        }

        match placed {
            Some(position) => motifs.push(Motif::random(
                position,
                size,
                Arc::clone(palette),
                params.patterns,
                rng,
            )),
            None => skipped += 1,
        }
    }

    log::debug!(
        "layout: placed {}/{} motifs on {}x{} ({} skipped, {} rejected samples)",
        motifs.len(),
        params.count,
        extent.width(),
        extent.height(),
        skipped,
        rejected_samples
    );

    Layout {
        motifs,
        requested: params.count,
        skipped,
        rejected_samples,
    }
}

/// Uniform coordinate in `[margin, dim - margin]`, or `None` when the inset
/// interval is empty.
fn sample_axis<R: RandomSource + ?Sized>(rng: &mut R, margin: f64, dim: f64) -> Option<f64> {
    let hi = dim - margin;
    if hi < margin {
        return None;
    }
    Some(rng.next_range(margin, hi))
}
