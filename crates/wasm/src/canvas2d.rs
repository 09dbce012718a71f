//! Replays a [`DisplayList`] on a browser `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;
use wheels_core::canvas::{DisplayList, DrawCommand, Stroke, Style, TextAlign};

pub fn align_name(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

pub fn font(size: f64) -> String {
    format!("{size}px sans-serif")
}

/// Draws every command of `list` on `ctx`.
pub fn draw(ctx: &CanvasRenderingContext2d, list: &DisplayList) -> Result<(), JsValue> {
    for command in list.commands() {
        match command {
            DrawCommand::Background { color } => {
                let extent = list.extent();
                ctx.save();
                ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, extent.width(), extent.height());
                ctx.restore();
            }
            DrawCommand::Save => ctx.save(),
            DrawCommand::Restore => ctx.restore(),
            DrawCommand::Translate { x, y } => ctx.translate(*x, *y)?,
            DrawCommand::Rotate { degrees } => ctx.rotate(degrees.to_radians())?,
            DrawCommand::Scale { factor } => ctx.scale(*factor, *factor)?,
            DrawCommand::Ellipse {
                x,
                y,
                diameter,
                style,
            } => ellipse(ctx, *x, *y, *diameter, style)?,
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                ctx.begin_path();
                ctx.move_to(*x1, *y1);
                ctx.line_to(*x2, *y2);
                apply_stroke(ctx, stroke);
            }
            DrawCommand::Text {
                x,
                y,
                size,
                text,
                color,
                align,
            } => {
                ctx.set_font(&font(*size));
                ctx.set_text_align(align_name(*align));
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(text, *x, *y)?;
            }
        }
    }
    Ok(())
}

fn ellipse(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    diameter: f64,
    style: &Style,
) -> Result<(), JsValue> {
    if diameter.is_nan() || diameter <= 0.0 {
        return Ok(());
    }
    ctx.begin_path();
    ctx.arc(x, y, diameter / 2.0, 0.0, TAU)?;
    if let Some(fill) = style.fill {
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
    }
    if let Some(stroke) = &style.stroke {
        apply_stroke(ctx, stroke);
    }
    Ok(())
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.set_stroke_style_str(&stroke.color.to_css());
    ctx.set_line_width(stroke.weight);
    ctx.stroke();
}
