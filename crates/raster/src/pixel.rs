//! Pure-computation rasterization of a [`DisplayList`] into an RGBA8 buffer.
//!
//! This module is always available (no feature gate) so that tests and the
//! `png` snapshot path share the same pixels. Circles and lines are drawn with
//! one pixel of analytic anti-aliasing and composited source-over. Text is not
//! rasterized.

use glam::{DAffine2, DVec2};
use wheels_core::canvas::{DisplayList, DrawCommand, Extent, Stroke, Style};
use wheels_core::color::Rgba;
use wheels_core::error::SketchError;

/// Straight-alpha RGBA8 pixel buffer, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Creates a fully transparent buffer.
    ///
    /// Returns `SketchError::InvalidDimensions` for a zero side or a size
    /// whose byte count overflows.
    pub fn new(width: u32, height: u32) -> Result<Self, SketchError> {
        if width == 0 || height == 0 {
            return Err(SketchError::InvalidDimensions);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SketchError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// A buffer covering `extent`, rounding fractional sides up.
    pub fn for_extent(extent: Extent) -> Result<Self, SketchError> {
        let side = |v: f64| {
            let v = v.ceil();
            if v > u32::MAX as f64 {
                Err(SketchError::InvalidDimensions)
            } else {
                Ok(v as u32)
            }
        };
        Self::new(side(extent.width())?, side(extent.height())?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The color at `(x, y)`, or `None` outside the buffer.
    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Source-over composite of `color` scaled by `coverage` in [0, 1].
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f64) {
        let sa = color.a as f64 / 255.0 * coverage;
        if sa <= 0.0 {
            return;
        }
        let i = self.offset(x, y);
        let px = &mut self.data[i..i + 4];
        let da = px[3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: u8, d: u8| {
            let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        px[0] = mix(color.r, px[0]);
        px[1] = mix(color.g, px[1]);
        px[2] = mix(color.b, px[2]);
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Blends `color` into every pixel whose centre lies within `bounds`
    /// (min, max in pixel space), with coverage computed per pixel centre.
    fn paint(&mut self, min: DVec2, max: DVec2, color: Rgba, coverage: impl Fn(DVec2) -> f64) {
        let clamp_x = |v: f64| v.clamp(0.0, self.width as f64) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, self.height as f64) as u32;
        let (x0, x1) = (clamp_x(min.x.floor()), clamp_x(max.x.ceil()));
        let (y0, y1) = (clamp_y(min.y.floor()), clamp_y(max.y.ceil()));
        for y in y0..y1 {
            for x in x0..x1 {
                let c = coverage(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
                if c > 0.0 {
                    self.blend(x, y, color, c.min(1.0));
                }
            }
        }
    }
}

/// Rasterizes `list` into a new buffer sized to its extent.
pub fn rasterize(list: &DisplayList) -> Result<Pixmap, SketchError> {
    let mut pixmap = Pixmap::for_extent(list.extent())?;
    draw(list, &mut pixmap);
    Ok(pixmap)
}

/// Executes every command of `list` against `pixmap`.
///
/// An unmatched `Restore` resets to the identity transform rather than
/// failing.
pub fn draw(list: &DisplayList, pixmap: &mut Pixmap) {
    let mut stack: Vec<DAffine2> = Vec::new();
    let mut transform = DAffine2::IDENTITY;
    let mut skipped_text = 0usize;

    for command in list.commands() {
        match command {
            DrawCommand::Background { color } => pixmap.fill(*color),
            DrawCommand::Save => stack.push(transform),
            DrawCommand::Restore => transform = stack.pop().unwrap_or(DAffine2::IDENTITY),
            DrawCommand::Translate { x, y } => {
                transform = transform * DAffine2::from_translation(DVec2::new(*x, *y));
            }
            DrawCommand::Rotate { degrees } => {
                transform = transform * DAffine2::from_angle(degrees.to_radians());
            }
            DrawCommand::Scale { factor } => {
                transform = transform * DAffine2::from_scale(DVec2::splat(*factor));
            }
            DrawCommand::Ellipse {
                x,
                y,
                diameter,
                style,
            } => circle(pixmap, &transform, DVec2::new(*x, *y), *diameter, style),
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => line(
                pixmap,
                &transform,
                DVec2::new(*x1, *y1),
                DVec2::new(*x2, *y2),
                stroke,
            ),
            DrawCommand::Text { .. } => skipped_text += 1,
        }
    }

    if skipped_text > 0 {
        log::debug!("raster: skipped {} text commands", skipped_text);
    }
}

/// Length multiplier of a rotation + uniform scale transform.
fn linear_scale(transform: &DAffine2) -> f64 {
    transform.matrix2.determinant().abs().sqrt()
}

fn circle(pixmap: &mut Pixmap, transform: &DAffine2, at: DVec2, diameter: f64, style: &Style) {
    let scale = linear_scale(transform);
    let center = transform.transform_point2(at);
    let radius = diameter * 0.5 * scale;
    if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
        return;
    }

    if let Some(fill) = style.fill {
        let reach = DVec2::splat(radius + 1.0);
        pixmap.paint(center - reach, center + reach, fill, |p| {
            (radius - p.distance(center) + 0.5).clamp(0.0, 1.0)
        });
    }

    if let Some(stroke) = style.stroke {
        let half = stroke.weight * 0.5 * scale;
        if !half.is_finite() || half <= 0.0 {
            return;
        }
        let reach = DVec2::splat(radius + half + 1.0);
        pixmap.paint(center - reach, center + reach, stroke.color, |p| {
            (half - (p.distance(center) - radius).abs() + 0.5).clamp(0.0, 1.0)
        });
    }
}

fn line(pixmap: &mut Pixmap, transform: &DAffine2, from: DVec2, to: DVec2, stroke: &Stroke) {
    let a = transform.transform_point2(from);
    let b = transform.transform_point2(to);
    let half = stroke.weight * 0.5 * linear_scale(transform);
    if !half.is_finite() || half <= 0.0 || !a.is_finite() || !b.is_finite() {
        return;
    }
    let reach = DVec2::splat(half + 1.0);
    pixmap.paint(a.min(b) - reach, a.max(b) + reach, stroke.color, |p| {
        (half - segment_distance(p, a, b) + 0.5).clamp(0.0, 1.0)
    });
}

fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheels_core::canvas::TextAlign;

    const BG: Rgba = Rgba::rgb(10, 20, 30);

    fn list(w: f64, h: f64) -> DisplayList {
        let mut list = DisplayList::new(Extent::new(w, h).unwrap());
        list.background(BG);
        list
    }

    #[test]
    fn new_rejects_zero_sides() {
        assert!(matches!(Pixmap::new(0, 4), Err(SketchError::InvalidDimensions)));
        assert!(matches!(Pixmap::new(4, 0), Err(SketchError::InvalidDimensions)));
    }

    #[test]
    fn for_extent_rounds_up() {
        let p = Pixmap::for_extent(Extent::new(10.2, 3.0).unwrap()).unwrap();
        assert_eq!((p.width(), p.height()), (11, 3));
        assert_eq!(p.data().len(), 11 * 3 * 4);
    }

    #[test]
    fn background_fills_every_pixel() {
        let p = rasterize(&list(8.0, 4.0)).unwrap();
        assert!(p.data().chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn filled_circle_covers_centre_not_corner() {
        let mut l = list(40.0, 40.0);
        l.ellipse(20.0, 20.0, 20.0, Style::fill(Rgba::WHITE));
        let p = rasterize(&l).unwrap();
        assert_eq!(p.pixel(20, 20), Some(Rgba::WHITE));
        assert_eq!(p.pixel(0, 0), Some(BG));
        assert_eq!(p.pixel(39, 39), Some(BG));
    }

    #[test]
    fn outline_leaves_the_inside_untouched() {
        let mut l = list(40.0, 40.0);
        l.ellipse(20.0, 20.0, 30.0, Style::outline(Rgba::WHITE, 2.0));
        let p = rasterize(&l).unwrap();
        assert_eq!(p.pixel(20, 20), Some(BG));
        assert_eq!(p.pixel(34, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn transforms_apply_and_restore() {
        let mut l = list(40.0, 40.0);
        l.saved(|l| {
            l.translate(30.0, 30.0);
            l.scale(2.0);
            l.disc(6.0, Style::fill(Rgba::WHITE));
        });
        l.disc(6.0, Style::fill(Rgba::BLACK));
        let p = rasterize(&l).unwrap();
        assert_eq!(p.pixel(30, 30), Some(Rgba::WHITE));
        // radius 6 after scaling
        assert_eq!(p.pixel(34, 30), Some(Rgba::WHITE));
        assert_eq!(p.pixel(1, 1), Some(Rgba::BLACK));
    }

    #[test]
    fn rotation_moves_offset_shapes() {
        let mut l = list(40.0, 40.0);
        l.translate(20.0, 20.0);
        l.rotate(90.0);
        l.ellipse(10.0, 0.0, 4.0, Style::fill(Rgba::WHITE));
        let p = rasterize(&l).unwrap();
        // +x rotated 90 degrees clockwise lands on +y
        assert_eq!(p.pixel(20, 30), Some(Rgba::WHITE));
        assert_eq!(p.pixel(30, 20), Some(BG));
    }

    #[test]
    fn half_alpha_blends_halfway() {
        let mut l = DisplayList::new(Extent::new(4.0, 4.0).unwrap());
        l.background(Rgba::BLACK);
        l.ellipse(2.0, 2.0, 40.0, Style::fill(Rgba::WHITE.with_alpha(128)));
        let p = rasterize(&l).unwrap();
        let px = p.pixel(1, 1).unwrap();
        assert!((127..=129).contains(&px.r), "r = {}", px.r);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn line_is_drawn_between_endpoints() {
        let mut l = list(40.0, 40.0);
        let stroke = Stroke {
            color: Rgba::WHITE,
            weight: 3.0,
        };
        l.line(DVec2::new(5.0, 20.5), DVec2::new(35.0, 20.5), stroke);
        let p = rasterize(&l).unwrap();
        assert_eq!(p.pixel(20, 20), Some(Rgba::WHITE));
        assert_eq!(p.pixel(20, 10), Some(BG));
        assert_eq!(p.pixel(1, 20), Some(BG));
    }

    #[test]
    fn text_and_unmatched_restore_are_harmless() {
        let mut l = list(10.0, 10.0);
        l.push(DrawCommand::Restore);
        l.text(DVec2::new(5.0, 5.0), 14.0, "Zoom: 2.0", Rgba::WHITE, TextAlign::Right);
        let p = rasterize(&l).unwrap();
        assert!(p.data().chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut l = list(10.0, 10.0);
        l.ellipse(5.0, 5.0, 0.0, Style::fill(Rgba::WHITE));
        l.ellipse(5.0, 5.0, f64::NAN, Style::fill(Rgba::WHITE));
        l.ellipse(5.0, 5.0, 4.0, Style::outline(Rgba::WHITE, 0.0));
        let p = rasterize(&l).unwrap();
        assert!(p.data().chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn opaque_background_stays_opaque(
                circles in prop::collection::vec(
                    (-50.0_f64..150.0, -50.0_f64..150.0, 0.0_f64..120.0, 0_u8..=255),
                    0..20,
                ),
            ) {
                let mut l = list(100.0, 100.0);
                for (x, y, d, a) in circles {
                    l.ellipse(x, y, d, Style::fill(Rgba::WHITE.with_alpha(a)).with_outline(Rgba::BLACK, 1.5));
                }
                let p = rasterize(&l).unwrap();
                prop_assert!(p.data().chunks_exact(4).all(|px| px[3] == 255));
            }
        }
    }
}
