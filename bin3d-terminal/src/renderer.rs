/// Half-block software rasterizer implementing the core drawing surface
use bin3d_core::{Color, RadialGradient, Rect, Surface, TextAlign, TextStyle};
use crossterm::{
    cursor,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Height, in surface pixels, the scene is laid out for.
const SCENE_HEIGHT: f64 = 600.0;

/// Upper half block: foreground paints the top subpixel, background the bottom.
const HALF_BLOCK: char = '▀';

const BACKGROUND: Color = Color::rgb(5, 10, 7);

/// Text placed in a terminal cell.
#[derive(Debug, Clone, PartialEq)]
enum CellText {
    Glyph { text: String, color: Color },
    /// Right half of a double-width glyph.
    Continuation,
}

/// A terminal-sized canvas of square subpixels, two per character cell.
///
/// Drawing coordinates are surface pixels; each subpixel covers `scale`
/// of them so the scene fits the terminal height.
pub struct TerminalSurface {
    cols: usize,
    rows: usize,
    scale: f64,
    pixels: Vec<Color>,
    text: Vec<Option<CellText>>,
}

impl TerminalSurface {
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut surface = Self {
            cols: 0,
            rows: 0,
            scale: 1.0,
            pixels: Vec::new(),
            text: Vec::new(),
        };
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.scale = SCENE_HEIGHT / (self.rows * 2) as f64;
        self.pixels = vec![BACKGROUND; self.cols * self.rows * 2];
        self.text = vec![None; self.cols * self.rows];
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Surface pixels per subpixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Surface position at the center of a character cell.
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> (f64, f64) {
        (
            (col as f64 + 0.5) * self.scale,
            (row as f64 * 2.0 + 1.0) * self.scale,
        )
    }

    /// Color of the subpixel at (x, y) in subpixel units.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.cols || y >= self.rows * 2 {
            return None;
        }
        Some(self.pixels[y * self.cols + x])
    }

    /// Text drawn into a character cell, if any.
    pub fn cell_text(&self, col: usize, row: usize) -> Option<&str> {
        match self.text.get(row * self.cols + col)? {
            Some(CellText::Glyph { text, .. }) => Some(text),
            _ => None,
        }
    }

    fn subpixel_height(&self) -> usize {
        self.rows * 2
    }

    fn center_of(&self, x: usize, y: usize) -> (f64, f64) {
        ((x as f64 + 0.5) * self.scale, (y as f64 + 0.5) * self.scale)
    }

    fn blend(&mut self, x: usize, y: usize, color: Color, opacity: f64) {
        let idx = y * self.cols + x;
        self.pixels[idx] = color.blend_over(self.pixels[idx], opacity);
    }

    /// Subpixel range covering `[min, max]` surface pixels along one axis.
    fn span(&self, min: f64, max: f64, limit: usize) -> std::ops::Range<usize> {
        if !(min.is_finite() && max.is_finite()) || max < 0.0 {
            return 0..0;
        }
        let start = (min / self.scale).floor().max(0.0) as usize;
        let end = ((max / self.scale).ceil().max(0.0) as usize).min(limit);
        start.min(end)..end
    }

    fn plot_line(&mut self, from: (f64, f64), to: (f64, f64), color: Color) {
        let Some(((x0, y0), (x1, y1))) = clip_segment(
            (from.0 / self.scale, from.1 / self.scale),
            (to.0 / self.scale, to.1 / self.scale),
            self.cols as f64,
            self.subpixel_height() as f64,
        ) else {
            return;
        };
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps.max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (x0 + (x1 - x0) * t).floor();
            let y = (y0 + (y1 - y0) * t).floor();
            if x >= 0.0 && y >= 0.0 && (x as usize) < self.cols && (y as usize) < self.subpixel_height() {
                self.blend(x as usize, y as usize, color, 1.0);
            }
        }
    }

    /// Write the canvas to the terminal starting at the top-left corner.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                let top = self.pixels[(row * 2) * self.cols + col];
                let bottom = self.pixels[(row * 2 + 1) * self.cols + col];
                match &self.text[row * self.cols + col] {
                    Some(CellText::Continuation) => continue,
                    Some(CellText::Glyph { text, color }) => {
                        let back = top.lerp(bottom, 0.5);
                        writer.queue(SetForegroundColor(to_terminal(color.blend_over(back, 1.0))))?;
                        writer.queue(SetBackgroundColor(to_terminal(back)))?;
                        writer.queue(Print(text))?;
                    }
                    None => {
                        writer.queue(SetForegroundColor(to_terminal(top)))?;
                        writer.queue(SetBackgroundColor(to_terminal(bottom)))?;
                        writer.queue(Print(HALF_BLOCK))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (f64, f64) {
        (
            self.cols as f64 * self.scale,
            self.subpixel_height() as f64 * self.scale,
        )
    }

    fn clear(&mut self) {
        self.pixels.fill(BACKGROUND);
        self.text.fill(None);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color, opacity: f64) {
        if points.len() < 3 {
            return;
        }
        let (min_x, max_x, min_y, max_y) = bounds(points);
        for y in self.span(min_y, max_y, self.subpixel_height()) {
            for x in self.span(min_x, max_x, self.cols) {
                let (px, py) = self.center_of(x, y);
                if contains(points, px, py) {
                    self.blend(x, y, color, opacity);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: Color, _line_width: f64) {
        // Lines are one subpixel wide; anything thinner still shows
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.plot_line(from, to, color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, opacity: f64) {
        let area = self.scale * self.scale;
        for y in self.span(rect.y, rect.y + rect.height, self.subpixel_height()) {
            for x in self.span(rect.x, rect.x + rect.width, self.cols) {
                // Partial coverage fades the cell so rects smaller than a
                // subpixel stay visible
                let (left, top) = (x as f64 * self.scale, y as f64 * self.scale);
                let overlap_x = (rect.x + rect.width).min(left + self.scale) - rect.x.max(left);
                let overlap_y = (rect.y + rect.height).min(top + self.scale) - rect.y.max(top);
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                let coverage = (overlap_x * overlap_y / area).min(1.0);
                self.blend(x, y, color, opacity * coverage);
            }
        }
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &RadialGradient) {
        for y in self.span(rect.y, rect.y + rect.height, self.subpixel_height()) {
            for x in self.span(rect.x, rect.x + rect.width, self.cols) {
                let (px, py) = self.center_of(x, y);
                if rect.contains(px, py) {
                    self.blend(x, y, gradient.sample(px, py), 1.0);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let clusters = clusters(text);
        let width: usize = clusters.iter().map(|c| display_width(c)).sum();
        if width == 0 || !(x.is_finite() && y.is_finite()) {
            return;
        }

        let col = (x / self.scale).floor() as i64;
        // Text baseline sits in the lower subpixel of a cell
        let row = (y / (self.scale * 2.0)).floor() as i64;
        if row < 0 || row >= self.rows as i64 {
            return;
        }
        let mut col = match style.align {
            TextAlign::Left => col,
            TextAlign::Center => col - width as i64 / 2,
            TextAlign::Right => col - width as i64,
        };

        for cluster in clusters {
            let cells = display_width(cluster) as i64;
            if col >= 0 && col + cells <= self.cols as i64 {
                let idx = row as usize * self.cols + col as usize;
                self.text[idx] = Some(CellText::Glyph {
                    text: cluster.to_string(),
                    color: style.color,
                });
                if cells == 2 {
                    self.text[idx + 1] = Some(CellText::Continuation);
                }
            }
            col += cells;
        }
    }
}

fn to_terminal(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), &(x, y)| (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y)),
    )
}

/// Even-odd point-in-polygon test.
fn contains(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Split text into user-perceived characters (base plus combining marks).
fn clusters(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Terminal columns a cluster occupies, one or two.
fn display_width(cluster: &str) -> usize {
    // Emoji presentation selector turns a narrow symbol into a wide glyph
    if cluster.contains('\u{FE0F}') {
        return 2;
    }
    UnicodeWidthStr::width(cluster).clamp(1, 2)
}

/// Clip a segment to the `[0, width] x [0, height]` box (Liang-Barsky).
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    height: f64,
) -> Option<((f64, f64), (f64, f64))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, from.0),
        (dx, width - from.0),
        (-dy, from.1),
        (dy, height - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}
