//! Abstract 2D drawing surface.
//!
//! Everything the renderer draws goes through [`Surface`]: polygon fills
//! and strokes, rectangles, radial gradients and text. Frontends implement
//! it over a browser canvas or a terminal cell buffer; [`RecordingSurface`]
//! keeps the calls as data for tests.

use crate::color::Color;

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and fill for a text draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub family: String,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: false,
            family: "sans-serif".to_string(),
            color,
            align: TextAlign::Center,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// CSS font shorthand, e.g. `bold 15px Kanit`.
    pub fn css_font(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{}{}px {}", weight, self.size, self.family)
    }
}

/// A radial gradient from `inner` at the center to `outer` at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: (f64, f64),
    pub radius: f64,
    pub inner: Color,
    pub outer: Color,
}

impl RadialGradient {
    /// Color at a point, clamped to `outer` beyond the radius.
    pub fn sample(&self, x: f64, y: f64) -> Color {
        if self.radius <= 0.0 {
            return self.outer;
        }
        let distance = ((x - self.center.0).powi(2) + (y - self.center.1).powi(2)).sqrt();
        self.inner.lerp(self.outer, distance / self.radius)
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Immediate-mode 2D drawing target.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);

    fn clear(&mut self);

    /// Fill the closed polygon through `points` at `opacity`.
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color, opacity: f64);

    /// Outline the closed polygon through `points`.
    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: Color, line_width: f64);

    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64);

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &RadialGradient);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillPolygon {
        points: Vec<(f64, f64)>,
        color: Color,
        opacity: f64,
    },
    StrokePolygon {
        points: Vec<(f64, f64)>,
        color: Color,
        line_width: f64,
    },
    FillRect {
        rect: Rect,
        color: Color,
        opacity: f64,
    },
    FillGradientRect {
        rect: Rect,
        gradient: RadialGradient,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Colors of the polygon fills, in draw order.
    pub fn fill_colors(&self) -> Vec<Color> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// Text draws, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color, opacity: f64) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
            opacity,
        });
    }

    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: Color, line_width: f64) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            opacity,
        });
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &RadialGradient) {
        self.commands.push(DrawCommand::FillGradientRect {
            rect,
            gradient: *gradient,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            style: style.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_sampling() {
        let gradient = RadialGradient {
            center: (0.0, 0.0),
            radius: 10.0,
            inner: Color::rgba(0, 255, 136, 0.28),
            outer: Color::TRANSPARENT,
        };
        assert_eq!(gradient.sample(0.0, 0.0), gradient.inner);
        assert_eq!(gradient.sample(30.0, 0.0).a, 0.0);
        let mid = gradient.sample(0.0, 5.0);
        assert!((mid.a - 0.14).abs() < 1e-9);
    }

    #[test]
    fn test_css_font() {
        let style = TextStyle::new(15.0, Color::WHITE).bold().family("Kanit");
        assert_eq!(style.css_font(), "bold 15px Kanit");
        assert_eq!(TextStyle::new(6.5, Color::WHITE).css_font(), "6.5px sans-serif");
    }

    #[test]
    fn test_recording() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.clear();
        surface.fill_polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], Color::WHITE, 1.0);
        surface.fill_text("hi", 1.0, 2.0, &TextStyle::new(9.0, Color::WHITE));
        assert_eq!(surface.commands.len(), 3);
        assert_eq!(surface.fill_colors(), vec![Color::WHITE]);
        assert_eq!(surface.texts(), vec!["hi"]);
    }
}
