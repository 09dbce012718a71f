#![deny(unsafe_code)]
//! Browser front-end for the wheels sketch.
//!
//! JavaScript owns the event listeners and the `requestAnimationFrame` loop
//! and forwards everything to a [`WheelsApp`]:
//!
//! ```js
//! const app = new WheelsApp(canvas, "enhanced");
//! canvas.onmousemove = (e) => app.pointer_move(e.offsetX, e.offsetY);
//! canvas.onmousedown = (e) => app.pointer_down(e.offsetX, e.offsetY, performance.now());
//! const loop = () => { app.frame(); requestAnimationFrame(loop); };
//! loop();
//! ```

mod canvas2d;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wheels_core::{Action, DisplayList, Extent, InputEvent, Palette, Sketch, Variant};

#[wasm_bindgen(start)]
pub fn start() {
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wheels-wasm starting");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Action as a JSON string, e.g. `{"action":"palette_cycled","value":"dusk"}`.
fn action_json(action: &Action) -> String {
    serde_json::to_string(action).unwrap_or_default()
}

#[wasm_bindgen]
pub struct WheelsApp {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sketch: Sketch,
    list: DisplayList,
}

#[wasm_bindgen]
impl WheelsApp {
    /// Starts a sketch sized to the canvas backing store. Without a seed the
    /// clock seeds it, so every page load looks different.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        variant: &str,
        seed: Option<u32>,
    ) -> Result<WheelsApp, JsValue> {
        let variant = Variant::from_name(variant).map_err(js_err)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let extent =
            Extent::new(canvas.width() as f64, canvas.height() as f64).map_err(js_err)?;
        let seed = seed.map_or_else(|| js_sys::Date::now() as u64, u64::from);
        let sketch = Sketch::with_variant(variant, extent, seed);
        log::info!(
            "{} sketch {}x{} seed {} with {} motifs",
            variant.name(),
            extent.width(),
            extent.height(),
            seed,
            sketch.motifs().len()
        );
        Ok(WheelsApp {
            canvas,
            ctx,
            sketch,
            list: DisplayList::new(extent),
        })
    }

    /// Advances one frame and draws it.
    pub fn frame(&mut self) -> Result<(), JsValue> {
        self.sketch.frame(&mut self.list);
        canvas2d::draw(&self.ctx, &self.list)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.sketch.handle(InputEvent::PointerMove { x, y });
    }

    /// `time_ms` should come from `performance.now()`.
    pub fn pointer_down(&mut self, x: f64, y: f64, time_ms: f64) -> String {
        action_json(&self.sketch.handle(InputEvent::PointerDown { x, y, time_ms }))
    }

    pub fn pointer_up(&mut self) -> String {
        action_json(&self.sketch.handle(InputEvent::PointerUp))
    }

    pub fn wheel(&mut self, delta: f64) -> String {
        action_json(&self.sketch.handle(InputEvent::Wheel { delta }))
    }

    pub fn key(&mut self, key: String) -> String {
        action_json(&self.sketch.handle(InputEvent::Key { key }))
    }

    /// Resizes the canvas backing store and the sketch together.
    pub fn resize(&mut self, width: u32, height: u32) -> String {
        let (width, height) = (width.max(1), height.max(1));
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        action_json(&self.sketch.handle(InputEvent::Resize {
            width: width as f64,
            height: height as f64,
        }))
    }

    pub fn zoom(&self) -> f64 {
        self.sketch.zoom()
    }

    pub fn motif_count(&self) -> usize {
        self.sketch.motifs().len()
    }

    pub fn palette(&self) -> String {
        self.sketch.active_palette().name().to_string()
    }

    pub fn variant(&self) -> String {
        self.sketch.variant().name().to_string()
    }

    pub fn variant_names() -> Vec<String> {
        Variant::list_names().iter().map(|s| s.to_string()).collect()
    }

    pub fn palette_names() -> Vec<String> {
        Palette::list_names().iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_json_is_tagged() {
        assert_eq!(
            action_json(&Action::DragStarted(2)),
            r#"{"action":"drag_started","value":2}"#
        );
        assert_eq!(action_json(&Action::None), r#"{"action":"none"}"#);
    }
}
