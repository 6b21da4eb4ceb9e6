//! [`Surface`] backed by a `CanvasRenderingContext2d`.

use drift_core::error::DriftError;
use drift_core::surface::{RadialGradient, Surface};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

fn js_err(what: &str, e: JsValue) -> DriftError {
    DriftError::Surface(format!("{what}: {}", e.as_string().unwrap_or_else(|| format!("{e:?}"))))
}

/// A 2D canvas context plus the logical size the world draws into.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn fill_circle(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        gradient: &RadialGradient,
    ) -> Result<(), DriftError> {
        let (gx, gy) = gradient.center();
        let fill = self
            .ctx
            .create_radial_gradient(gx, gy, 0.0, gx, gy, gradient.radius())
            .map_err(|e| js_err("createRadialGradient", e))?;
        for stop in gradient.stops() {
            fill.add_color_stop(stop.offset as f32, &stop.color.to_css())
                .map_err(|e| js_err("addColorStop", e))?;
        }
        self.ctx.begin_path();
        self.ctx
            .arc(cx, cy, radius, 0.0, std::f64::consts::TAU)
            .map_err(|e| js_err("arc", e))?;
        self.ctx.set_fill_style_canvas_gradient(&fill);
        self.ctx.fill();
        Ok(())
    }
}
