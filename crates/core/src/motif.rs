//! A placed wheel and its per-motif animation parameters.

use std::sync::Arc;

use glam::DVec2;
use serde::{Serialize, Serializer};

use crate::palette::Palette;
use crate::prng::RandomSource;

/// Ornamentation drawn inside a motif's main disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Scattered dots, concentric ring lines and an inner dot orbit.
    #[default]
    Standard,
    /// Three-turn dot spiral with concentric rings.
    Spiral,
    /// Radial lines of dots inside a single ring.
    Radial,
}

impl PatternKind {
    pub const ALL: [PatternKind; 3] = [
        PatternKind::Standard,
        PatternKind::Spiral,
        PatternKind::Radial,
    ];

    /// Uniform draw over all kinds.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.below(Self::ALL.len())]
    }
}

/// One placed decorative wheel.
///
/// Position is fixed after placement except while dragged. Size, rotation
/// offset and speed never change. The palette is a shared handle, swapped for
/// every motif at once when the palette changes.
#[derive(Debug, Clone, Serialize)]
pub struct Motif {
    pub position: DVec2,
    /// Diameter chosen at placement time.
    pub base_size: f64,
    /// Degrees.
    pub rotation_offset: f64,
    pub rotation_speed: f64,
    #[serde(serialize_with = "serialize_palette_name")]
    pub palette: Arc<Palette>,
    pub pattern: PatternKind,
    pub is_being_dragged: bool,
    /// Degrees.
    pub pulse_offset: f64,
}

impl Motif {
    /// Creates a motif at `position`, drawing its animation parameters from
    /// `rng` in a fixed order: rotation offset, rotation speed, pattern kind
    /// (only when `patterns` is set), pulse offset.
    pub fn random<R: RandomSource + ?Sized>(
        position: DVec2,
        base_size: f64,
        palette: Arc<Palette>,
        patterns: bool,
        rng: &mut R,
    ) -> Self {
        let rotation_offset = rng.next_degrees();
        let rotation_speed = rng.next_range(0.5, 1.5);
        let pattern = if patterns {
            PatternKind::random(rng)
        } else {
            PatternKind::Standard
        };
        let pulse_offset = rng.next_degrees();
        Self {
            position,
            base_size,
            rotation_offset,
            rotation_speed,
            palette,
            pattern,
            is_being_dragged: false,
            pulse_offset,
        }
    }

    pub fn radius(&self) -> f64 {
        self.base_size / 2.0
    }

    /// Hit test: strictly inside the base circle.
    pub fn contains(&self, point: DVec2) -> bool {
        self.position.distance(point) < self.radius()
    }
}

fn serialize_palette_name<S: Serializer>(palette: &Arc<Palette>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(palette.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Xorshift64;

    fn motif_at(x: f64, y: f64, size: f64) -> Motif {
        let mut rng = Xorshift64::new(1);
        Motif::random(
            DVec2::new(x, y),
            size,
            Arc::new(Palette::meadow()),
            false,
            &mut rng,
        )
    }

    #[test]
    fn random_parameters_fall_in_their_ranges() {
        let mut rng = Xorshift64::new(99);
        let palette = Arc::new(Palette::coral());
        for _ in 0..500 {
            let m = Motif::random(DVec2::ZERO, 200.0, Arc::clone(&palette), true, &mut rng);
            assert!((0.0..360.0).contains(&m.rotation_offset));
            assert!((0.5..1.5).contains(&m.rotation_speed));
            assert!((0.0..360.0).contains(&m.pulse_offset));
            assert!(!m.is_being_dragged);
        }
    }

    #[test]
    fn patterns_disabled_always_yields_standard() {
        let mut rng = Xorshift64::new(7);
        let palette = Arc::new(Palette::coral());
        for _ in 0..100 {
            let m = Motif::random(DVec2::ZERO, 200.0, Arc::clone(&palette), false, &mut rng);
            assert_eq!(m.pattern, PatternKind::Standard);
        }
    }

    #[test]
    fn pattern_draw_reaches_every_kind() {
        let mut rng = Xorshift64::new(2024);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let kind = PatternKind::random(&mut rng);
            seen[PatternKind::ALL.iter().position(|k| *k == kind).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s), "not every kind drawn: {seen:?}");
    }

    #[test]
    fn contains_is_strict_on_the_rim() {
        let m = motif_at(100.0, 100.0, 200.0);
        assert!(m.contains(DVec2::new(100.0, 100.0)));
        assert!(m.contains(DVec2::new(199.9, 100.0)));
        assert!(!m.contains(DVec2::new(200.0, 100.0)));
        assert!(!m.contains(DVec2::new(250.0, 250.0)));
    }

    #[test]
    fn serializes_palette_by_name() {
        let m = motif_at(1.0, 2.0, 50.0);
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["palette"], "meadow");
        assert_eq!(v["pattern"], "standard");
        assert_eq!(v["base_size"], 50.0);
    }
}
