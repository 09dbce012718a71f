#![deny(unsafe_code)]
//! Core of the wheels generative sketch.
//!
//! Provides motif placement (`layout`), the per-motif render pass that writes
//! a backend-neutral `DisplayList`, the pointer `Interaction` state machine,
//! palettes, the `Xorshift64` PRNG behind the `RandomSource` trait, variant
//! `Tuning`, and the `Sketch` driver that ties them together frame by frame.

pub mod canvas;
pub mod color;
pub mod error;
pub mod event;
pub mod interaction;
pub mod layout;
pub mod motif;
pub mod palette;
pub mod params;
pub mod prng;
pub mod render;
pub mod script;
pub mod sketch;
pub mod tuning;

pub use canvas::{DisplayList, DrawCommand, Extent, Stroke, Style, TextAlign};
pub use color::Rgba;
pub use error::SketchError;
pub use event::{Action, InputEvent};
pub use interaction::{Interaction, PointerState};
pub use layout::{Layout, LayoutParams};
pub use motif::{Motif, PatternKind};
pub use palette::{Palette, PaletteBook};
pub use prng::{RandomSource, Xorshift64};
pub use script::{ScheduledEvent, Script};
pub use sketch::{AnimationState, LayoutStats, Sketch};
pub use tuning::{Tuning, Variant};
