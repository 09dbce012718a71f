//! Ordered color palettes and the book of palettes a sketch cycles through.
//!
//! Motifs hold an `Arc<Palette>` pointing at the book's active entry. Cycling
//! the book hands out the next shared palette, which every motif then
//! references; palettes themselves are never copied or mutated.

use std::sync::Arc;

use crate::color::Rgba;
use crate::error::SketchError;
use crate::prng::RandomSource;

/// Built-in palette names, in cycling order.
const BUILTIN_NAMES: &[&str] = &["meadow", "coral", "dusk", "desert", "harbor"];

/// A named, fixed, ordered list of colors.
///
/// The renderer addresses slots 0 through 3 directly (disc, rings, center
/// dot, spiral rings), so a palette holds at least [`Palette::MIN_COLORS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgba>,
}

impl Palette {
    /// Fewest colors a palette may hold.
    pub const MIN_COLORS: usize = 4;

    /// Creates a palette from colors.
    ///
    /// Returns `SketchError::InvalidPalette` if fewer than
    /// [`Palette::MIN_COLORS`] colors are given.
    pub fn new(name: impl Into<String>, colors: Vec<Rgba>) -> Result<Self, SketchError> {
        if colors.len() < Self::MIN_COLORS {
            return Err(SketchError::InvalidPalette(format!(
                "palette requires at least {} colors, got {}",
                Self::MIN_COLORS,
                colors.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    /// Creates a palette by parsing `"#rrggbb"` strings.
    pub fn from_hex(name: impl Into<String>, hexes: &[&str]) -> Result<Self, SketchError> {
        let colors = hexes
            .iter()
            .map(|h| Rgba::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, colors)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Color at `index`, wrapping past the end.
    pub fn slot(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    /// Draws one color uniformly at random.
    pub fn random_color<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Rgba {
        self.colors[rng.below(self.colors.len())]
    }

    // -- Built-in palettes --

    /// Soft greens, sky blue, pinks.
    pub fn meadow() -> Self {
        Self::from_hex(
            "meadow",
            &["#8BC34A", "#81D4FA", "#F48FB1", "#CE93D8", "#FFCC80", "#AED581"],
        )
        .expect("meadow palette hex values are valid")
    }

    /// Coral red, teals, sand, amber.
    pub fn coral() -> Self {
        Self::from_hex(
            "coral",
            &["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#FFB300"],
        )
        .expect("coral palette hex values are valid")
    }

    /// Plum, mauve, cobalt and warm oranges.
    pub fn dusk() -> Self {
        Self::from_hex(
            "dusk",
            &["#6A0572", "#AB83A1", "#3C91E6", "#342E37", "#FA824C", "#FF7043"],
        )
        .expect("dusk palette hex values are valid")
    }

    /// Teal, saffron, terracotta.
    pub fn desert() -> Self {
        Self::from_hex(
            "desert",
            &["#2A9D8F", "#E9C46A", "#F4A261", "#E76F51", "#264653", "#FFD740"],
        )
        .expect("desert palette hex values are valid")
    }

    /// Signal red, foam, navy.
    pub fn harbor() -> Self {
        Self::from_hex(
            "harbor",
            &["#E63946", "#F1FAEE", "#A8DADC", "#457B9D", "#1D3557", "#FF9E00"],
        )
        .expect("harbor palette hex values are valid")
    }

    /// Names of the built-in palettes, in cycling order.
    pub fn list_names() -> &'static [&'static str] {
        BUILTIN_NAMES
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, SketchError> {
        match name {
            "meadow" => Ok(Self::meadow()),
            "coral" => Ok(Self::coral()),
            "dusk" => Ok(Self::dusk()),
            "desert" => Ok(Self::desert()),
            "harbor" => Ok(Self::harbor()),
            _ => Err(SketchError::UnknownPalette(name.to_string())),
        }
    }
}

/// The cyclic list of palettes available to a sketch, with one active entry.
#[derive(Debug, Clone)]
pub struct PaletteBook {
    palettes: Vec<Arc<Palette>>,
    active: usize,
}

impl PaletteBook {
    /// All built-in palettes.
    pub fn builtin() -> Self {
        Self {
            palettes: BUILTIN_NAMES
                .iter()
                .filter_map(|name| Palette::from_name(name).ok())
                .map(Arc::new)
                .collect(),
            active: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Shared handle to the active palette.
    pub fn active(&self) -> &Arc<Palette> {
        &self.palettes[self.active]
    }

    /// Advances to the next palette (wrapping) and returns it.
    pub fn cycle(&mut self) -> Arc<Palette> {
        self.active = (self.active + 1) % self.palettes.len();
        Arc::clone(&self.palettes[self.active])
    }

    /// Makes the palette called `name` active.
    pub fn select(&mut self, name: &str) -> Result<Arc<Palette>, SketchError> {
        let idx = self
            .palettes
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| SketchError::UnknownPalette(name.to_string()))?;
        self.active = idx;
        Ok(Arc::clone(&self.palettes[idx]))
    }
}
