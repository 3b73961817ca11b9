/// `Surface` over an HTML canvas 2D context
use bin3d_core::{Color, RadialGradient, Rect, Surface, TextAlign, TextStyle};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draws through `CanvasRenderingContext2d`.
///
/// Canvas calls that fail are logged and skipped so one bad call never
/// stops the frame.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    fn trace_path(&self, points: &[(f64, f64)]) -> bool {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        for &(x, y) in rest {
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
        true
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        warn!(?err, "canvas {} failed", what);
    }
}

/// CSS `textAlign` keyword.
pub fn text_align_css(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color, opacity: f64) {
        if !self.trace_path(points) {
            return;
        }
        self.ctx.set_global_alpha(opacity);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        self.ctx.set_global_alpha(1.0);
    }

    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: Color, line_width: f64) {
        if !self.trace_path(points) {
            return;
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64) {
        self.ctx.set_global_alpha(opacity);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &RadialGradient) {
        let (cx, cy) = gradient.center;
        let fill = match self
            .ctx
            .create_radial_gradient(cx, cy, 0.0, cx, cy, gradient.radius)
        {
            Ok(fill) => fill,
            Err(err) => {
                warn!(?err, "canvas gradient failed");
                return;
            }
        };
        report("gradient stop", fill.add_color_stop(0.0, &gradient.inner.to_css()));
        report("gradient stop", fill.add_color_stop(1.0, &gradient.outer.to_css()));
        self.ctx.set_fill_style_canvas_gradient(&fill);
        self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.ctx.save();
        self.ctx.set_text_align(text_align_css(style.align));
        self.ctx.set_font(&style.css_font());
        self.ctx.set_fill_style_str(&style.color.to_css());
        report("text", self.ctx.fill_text(text, x, y));
        self.ctx.restore();
    }
}
