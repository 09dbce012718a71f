//! The sketch driver: owns the motifs and all animation state, renders a
//! frame on request and applies input events between frames.

use std::sync::Arc;

use glam::DVec2;
use serde::Serialize;

use crate::canvas::{DisplayList, Extent, TextAlign};
use crate::color::Rgba;
use crate::error::SketchError;
use crate::event::{Action, InputEvent};
use crate::interaction::{Interaction, Press};
use crate::layout::{self, Layout};
use crate::motif::{Motif, PatternKind};
use crate::palette::{Palette, PaletteBook};
use crate::prng::{RandomSource, Xorshift64};
use crate::render::{self, FrameContext};
use crate::tuning::{Tuning, Variant};

pub const BACKGROUND: Rgba = Rgba::rgb(0x1e, 0x2c, 0x3a);

const ZOOM_LABEL_INSET: DVec2 = DVec2::new(20.0, 30.0);
const ZOOM_LABEL_SIZE: f64 = 14.0;

/// Everything that changes from frame to frame apart from the motifs.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Accumulated rotation, degrees. Grows without bound.
    pub rotation: f64,
    /// Degrees, kept in [0, 360].
    pub pulse_phase: f64,
    pub pointer: DVec2,
    pub palettes: PaletteBook,
    pub interaction: Interaction,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            pulse_phase: 0.0,
            pointer: DVec2::ZERO,
            palettes: PaletteBook::builtin(),
            interaction: Interaction::new(),
        }
    }
}

/// Counters from the most recent generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub requested: usize,
    pub placed: usize,
    pub skipped: usize,
    pub rejected_samples: usize,
}

impl LayoutStats {
    fn of(layout: &Layout) -> Self {
        Self {
            requested: layout.requested,
            placed: layout.motifs.len(),
            skipped: layout.skipped,
            rejected_samples: layout.rejected_samples,
        }
    }
}

/// One running sketch.
#[derive(Debug, Clone)]
pub struct Sketch {
    variant: Variant,
    tuning: Tuning,
    extent: Extent,
    motifs: Vec<Motif>,
    state: AnimationState,
    rng: Xorshift64,
    stats: LayoutStats,
}

impl Sketch {
    /// Creates a sketch and runs the first generation pass.
    ///
    /// Fails when `tuning` does not pass [`Tuning::validate`].
    pub fn new(
        variant: Variant,
        extent: Extent,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, SketchError> {
        tuning.validate()?;
        Ok(Self::assemble(variant, extent, tuning, seed))
    }

    /// A sketch with the preset tuning of `variant`.
    pub fn with_variant(variant: Variant, extent: Extent, seed: u64) -> Self {
        Self::assemble(variant, extent, Tuning::for_variant(variant), seed)
    }

    fn assemble(variant: Variant, extent: Extent, tuning: Tuning, seed: u64) -> Self {
        let mut sketch = Self {
            variant,
            tuning,
            extent,
            motifs: Vec::new(),
            state: AnimationState::default(),
            rng: Xorshift64::new(seed),
            stats: LayoutStats::default(),
        };
        sketch.generate();
        sketch
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Motifs in generation order.
    pub fn motifs(&self) -> &[Motif] {
        &self.motifs
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.interaction.zoom()
    }

    pub fn active_palette(&self) -> &Arc<Palette> {
        self.state.palettes.active()
    }

    pub fn layout_stats(&self) -> LayoutStats {
        self.stats
    }

    /// Advances the animation by one frame and writes it into `out`.
    pub fn frame(&mut self, out: &mut DisplayList) {
        out.reset(self.extent);
        let state = &mut self.state;
        state.pulse_phase = advance_phase(state.pulse_phase, self.tuning.pulse_step);
        state.rotation += render::map_range(
            state.pointer.x,
            0.0,
            self.extent.width(),
            &self.tuning.spin_band,
        );
        state.interaction.follow(state.pointer, &mut self.motifs);

        out.background(BACKGROUND);

        let zoom = state.interaction.zoom();
        let center = self.extent.center();
        let frame = FrameContext {
            extent: self.extent,
            pointer: state.pointer,
            rotation: state.rotation,
            pulse_phase: state.pulse_phase,
            tuning: &self.tuning,
        };
        let motifs = &self.motifs;
        let rng = &mut self.rng;
        out.saved(|out| {
            out.translate(center.x, center.y);
            out.scale(zoom);
            out.translate(-center.x, -center.y);
            for motif in motifs {
                render::render_motif(motif, &frame, rng, out);
            }
        });

        if zoom != 1.0 {
            let at = DVec2::new(self.extent.width() - ZOOM_LABEL_INSET.x, ZOOM_LABEL_INSET.y);
            out.text(
                at,
                ZOOM_LABEL_SIZE,
                format!("Zoom: {zoom:.1}"),
                Rgba::WHITE,
                TextAlign::Right,
            );
        }
    }

    /// Applies one input event.
    pub fn handle(&mut self, event: InputEvent) -> Action {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.state.pointer = DVec2::new(x, y);
                self.state
                    .interaction
                    .follow(self.state.pointer, &mut self.motifs);
                Action::None
            }
            InputEvent::PointerDown { x, y, time_ms } => {
                let pointer = DVec2::new(x, y);
                self.state.pointer = pointer;
                let press =
                    self.state
                        .interaction
                        .press(pointer, time_ms, &mut self.motifs, &self.tuning);
                match press {
                    Press::ZoomReset => {
                        log::info!("[mouse] double press, zoom reset");
                        Action::ZoomReset
                    }
                    Press::DragStarted(i) => {
                        log::info!("[mouse] begin drag on motif {}", i);
                        Action::DragStarted(i)
                    }
                    Press::PaletteRequested => Action::PaletteCycled(self.cycle_palette()),
                    Press::Ignored => Action::None,
                }
            }
            InputEvent::PointerUp => match self.state.interaction.release(&mut self.motifs) {
                Some(i) => {
                    log::info!("[mouse] end drag on motif {}", i);
                    Action::DragEnded(i)
                }
                None => Action::None,
            },
            InputEvent::Wheel { delta } => {
                match self.state.interaction.wheel(delta, &self.tuning) {
                    Some(zoom) => Action::ZoomChanged(zoom),
                    None => Action::None,
                }
            }
            InputEvent::Key { key } => match key.as_str() {
                " " => Action::Regenerated(self.regenerate()),
                "c" | "C" => Action::PaletteCycled(self.cycle_palette()),
                "r" | "R" if self.tuning.patterns => {
                    self.randomize_patterns();
                    Action::PatternsRandomized
                }
                _ => Action::None,
            },
            InputEvent::Resize { width, height } => match Extent::new(width, height) {
                Ok(extent) => {
                    self.resize(extent);
                    Action::Resized
                }
                Err(_) => {
                    log::warn!("[resize] ignoring {}x{}", width, height);
                    Action::None
                }
            },
        }
    }

    /// Replaces every motif with a fresh layout; returns how many were placed.
    ///
    /// Any drag in progress ends, since the dragged motif no longer exists.
    pub fn regenerate(&mut self) -> usize {
        self.state.interaction.cancel_drag();
        self.generate();
        log::info!(
            "[keys] regenerated {}/{} motifs",
            self.stats.placed,
            self.stats.requested
        );
        self.stats.placed
    }

    /// Makes the next palette active for every motif; returns its name.
    pub fn cycle_palette(&mut self) -> String {
        let palette = self.state.palettes.cycle();
        self.assign_palette(&palette);
        log::info!("[keys] palette -> {}", palette.name());
        palette.name().to_string()
    }

    /// Makes the named palette active for every motif.
    pub fn select_palette(&mut self, name: &str) -> Result<(), SketchError> {
        let palette = self.state.palettes.select(name)?;
        self.assign_palette(&palette);
        Ok(())
    }

    /// Draws a new pattern kind and pulse offset for every motif.
    pub fn randomize_patterns(&mut self) {
        for motif in &mut self.motifs {
            motif.pattern = PatternKind::random(&mut self.rng);
            motif.pulse_offset = self.rng.next_degrees();
        }
        log::info!("[keys] randomized patterns of {} motifs", self.motifs.len());
    }

    /// Moves to a new surface size, regenerating when the tuning asks for it.
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        if self.tuning.regenerate_on_resize {
            self.state.interaction.cancel_drag();
            self.generate();
        }
        log::debug!(
            "[resize] {}x{}, {} motifs",
            extent.width(),
            extent.height(),
            self.motifs.len()
        );
    }

    fn generate(&mut self) {
        let layout = layout::generate(
            self.extent,
            &self.tuning.layout_params(),
            self.state.palettes.active(),
            &mut self.rng,
        );
        self.stats = LayoutStats::of(&layout);
        self.motifs = layout.motifs;
    }

    fn assign_palette(&mut self, palette: &Arc<Palette>) {
        for motif in &mut self.motifs {
            motif.palette = Arc::clone(palette);
        }
    }
}

/// Adds `step` degrees and wraps back into [0, 360].
fn advance_phase(phase: f64, step: f64) -> f64 {
    let next = phase + step;
    if next > 360.0 || next < 0.0 {
        next.rem_euclid(360.0)
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;

    fn extent() -> Extent {
        Extent::new(800.0, 600.0).unwrap()
    }

    fn sketch(variant: Variant, seed: u64) -> Sketch {
        Sketch::with_variant(variant, extent(), seed)
    }

    fn press(s: &mut Sketch, at: DVec2, time_ms: f64) -> Action {
        s.handle(InputEvent::PointerDown {
            x: at.x,
            y: at.y,
            time_ms,
        })
    }

    fn zoom_label(list: &DisplayList) -> Option<&str> {
        list.commands().iter().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    #[test]
    fn new_places_motifs_sharing_the_active_palette() {
        let s = sketch(Variant::Enhanced, 3);
        assert!(!s.motifs().is_empty());
        assert!(s
            .motifs()
            .iter()
            .all(|m| Arc::ptr_eq(&m.palette, s.active_palette())));
        let stats = s.layout_stats();
        assert_eq!(stats.placed + stats.skipped, stats.requested);
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = sketch(Variant::Enhanced, 11);
        let mut b = sketch(Variant::Enhanced, 11);
        let mut la = DisplayList::new(extent());
        let mut lb = DisplayList::new(extent());
        for _ in 0..5 {
            a.handle(InputEvent::PointerMove { x: 300.0, y: 200.0 });
            b.handle(InputEvent::PointerMove { x: 300.0, y: 200.0 });
            a.frame(&mut la);
            b.frame(&mut lb);
            assert_eq!(la, lb);
        }
    }

    #[test]
    fn frame_starts_with_background_and_balances_transforms() {
        let mut s = sketch(Variant::Basic, 5);
        let mut list = DisplayList::new(extent());
        s.frame(&mut list);
        assert_eq!(
            list.commands()[0],
            DrawCommand::Background { color: BACKGROUND }
        );
        assert!(list.is_balanced());
    }

    #[test]
    fn pulse_phase_wraps_past_360() {
        let mut tuning = Tuning::for_variant(Variant::Enhanced);
        tuning.pulse_step = 100.0;
        let mut s = Sketch::new(Variant::Enhanced, extent(), tuning, 1).unwrap();
        let mut list = DisplayList::new(extent());
        for _ in 0..4 {
            s.frame(&mut list);
        }
        assert_eq!(s.state().pulse_phase, 40.0);
    }

    #[test]
    fn new_rejects_unusable_tuning() {
        let mut reversed = Tuning::for_variant(Variant::Enhanced);
        reversed.zoom_range = 5.0..0.5;
        assert!(matches!(
            Sketch::new(Variant::Enhanced, extent(), reversed, 1),
            Err(SketchError::InvalidParam { name, .. }) if name == "zoom_range"
        ));

        let mut flat = Tuning::for_variant(Variant::Enhanced);
        flat.falloff_radius = 0.0;
        assert!(Sketch::new(Variant::Enhanced, extent(), flat, 1).is_err());
    }

    #[test]
    fn advance_phase_keeps_360_and_wraps_negatives() {
        assert_eq!(advance_phase(358.0, 2.0), 360.0);
        assert_eq!(advance_phase(360.0, 2.0), 2.0);
        assert_eq!(advance_phase(1.0, -2.0), 359.0);
    }

    #[test]
    fn rotation_speed_follows_pointer_x() {
        let mut s = sketch(Variant::Enhanced, 1);
        let mut list = DisplayList::new(extent());
        s.frame(&mut list);
        assert!((s.state().rotation - 0.3).abs() < 1e-12);
        s.handle(InputEvent::PointerMove { x: 800.0, y: 0.0 });
        s.frame(&mut list);
        assert!((s.state().rotation - 2.1).abs() < 1e-12);
    }

    #[test]
    fn cycling_through_every_palette_returns_to_the_first() {
        let mut s = sketch(Variant::Enhanced, 2);
        let original = Arc::clone(s.active_palette());
        let n = s.state().palettes.len();
        for i in 0..n {
            s.handle(InputEvent::key("c"));
            let expected_same = i + 1 == n;
            assert_eq!(Arc::ptr_eq(s.active_palette(), &original), expected_same);
            assert!(s
                .motifs()
                .iter()
                .all(|m| Arc::ptr_eq(&m.palette, s.active_palette())));
        }
    }

    #[test]
    fn select_palette_reassigns_motifs() {
        let mut s = sketch(Variant::Interactive, 2);
        s.select_palette("harbor").unwrap();
        assert!(s.motifs().iter().all(|m| m.palette.name() == "harbor"));
        assert!(s.select_palette("neon").is_err());
    }

    #[test]
    fn unmoved_drag_restores_exact_position() {
        let mut s = sketch(Variant::Enhanced, 9);
        let before = s.motifs()[0].position;
        let grab = before + DVec2::new(3.3, -7.1);
        assert_eq!(press(&mut s, grab, 1000.0), Action::DragStarted(0));
        let mut list = DisplayList::new(extent());
        s.frame(&mut list);
        assert_eq!(s.handle(InputEvent::PointerUp), Action::DragEnded(0));
        assert_eq!(s.motifs()[0].position, before);
        assert!(!s.motifs()[0].is_being_dragged);
    }

    #[test]
    fn dragged_motif_follows_the_pointer() {
        let mut s = sketch(Variant::Interactive, 9);
        let before = s.motifs()[0].position;
        press(&mut s, before, 0.0);
        s.handle(InputEvent::PointerMove {
            x: before.x + 40.0,
            y: before.y - 25.0,
        });
        let after = s.motifs()[0].position;
        assert!((after - (before + DVec2::new(40.0, -25.0))).length() < 1e-9);
    }

    #[test]
    fn basic_press_cycles_palette() {
        let mut s = sketch(Variant::Basic, 4);
        let first = s.active_palette().name().to_string();
        let action = press(&mut s, DVec2::new(1.0, 1.0), 0.0);
        match action {
            Action::PaletteCycled(name) => assert_ne!(name, first),
            other => panic!("expected palette cycle, got {other:?}"),
        }
        assert!(s.motifs().iter().all(|m| !m.is_being_dragged));
    }

    #[test]
    fn wheel_zoom_is_clamped_and_labelled() {
        let mut s = sketch(Variant::Enhanced, 1);
        let mut list = DisplayList::new(extent());
        s.frame(&mut list);
        assert_eq!(zoom_label(&list), None);

        assert_eq!(
            s.handle(InputEvent::Wheel { delta: 100_000.0 }),
            Action::ZoomChanged(3.0)
        );
        s.frame(&mut list);
        assert_eq!(zoom_label(&list), Some("Zoom: 3.0"));

        s.handle(InputEvent::Wheel { delta: -100_000.0 });
        assert_eq!(s.zoom(), 0.5);
    }

    #[test]
    fn wheel_is_ignored_without_zoom() {
        let mut s = sketch(Variant::Interactive, 1);
        assert_eq!(s.handle(InputEvent::Wheel { delta: 500.0 }), Action::None);
        assert_eq!(s.zoom(), 1.0);
    }

    #[test]
    fn double_press_resets_zoom() {
        let mut s = sketch(Variant::Enhanced, 1);
        s.handle(InputEvent::Wheel { delta: 700.0 });
        press(&mut s, DVec2::new(5.0, 5.0), 1000.0);
        s.handle(InputEvent::PointerUp);
        assert_eq!(press(&mut s, DVec2::new(5.0, 5.0), 1150.0), Action::ZoomReset);
        assert_eq!(s.zoom(), 1.0);
    }

    #[test]
    fn space_regenerates_and_ends_drag() {
        let mut s = sketch(Variant::Enhanced, 6);
        let at = s.motifs()[0].position;
        press(&mut s, at, 0.0);
        match s.handle(InputEvent::key(" ")) {
            Action::Regenerated(n) => assert_eq!(n, s.motifs().len()),
            other => panic!("expected regeneration, got {other:?}"),
        }
        assert_eq!(s.state().interaction.dragging(), None);
        assert!(s.motifs().iter().all(|m| !m.is_being_dragged));
        assert_eq!(s.handle(InputEvent::PointerUp), Action::None);
    }

    #[test]
    fn randomize_patterns_needs_pattern_support() {
        let mut basic = sketch(Variant::Basic, 6);
        assert_eq!(basic.handle(InputEvent::key("r")), Action::None);

        let mut s = sketch(Variant::Enhanced, 6);
        let positions: Vec<DVec2> = s.motifs().iter().map(|m| m.position).collect();
        assert_eq!(s.handle(InputEvent::key("R")), Action::PatternsRandomized);
        let after: Vec<DVec2> = s.motifs().iter().map(|m| m.position).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn resize_regenerates_only_when_tuned_to() {
        let mut interactive = sketch(Variant::Interactive, 8);
        let action = interactive.handle(InputEvent::Resize {
            width: 1600.0,
            height: 1200.0,
        });
        assert_eq!(action, Action::Resized);
        assert_eq!(interactive.extent().width(), 1600.0);
        for m in interactive.motifs() {
            assert!(m.position.x <= 1600.0 - m.base_size * 0.7);
        }

        let mut enhanced = sketch(Variant::Enhanced, 8);
        let before: Vec<DVec2> = enhanced.motifs().iter().map(|m| m.position).collect();
        enhanced.handle(InputEvent::Resize {
            width: 400.0,
            height: 300.0,
        });
        let after: Vec<DVec2> = enhanced.motifs().iter().map(|m| m.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn invalid_resize_is_ignored() {
        let mut s = sketch(Variant::Interactive, 8);
        let action = s.handle(InputEvent::Resize {
            width: 0.0,
            height: 300.0,
        });
        assert_eq!(action, Action::None);
        assert_eq!(s.extent(), extent());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn zoom_stays_in_range(deltas in prop::collection::vec(-5000.0_f64..5000.0, 0..40)) {
                let mut s = sketch(Variant::Enhanced, 1);
                for delta in deltas {
                    s.handle(InputEvent::Wheel { delta });
                    prop_assert!((0.5..=3.0).contains(&s.zoom()));
                }
            }
        }
    }
}
