/// Point annotations drawn on top of projected faces
use tracing::debug;

use crate::color::Color;
use crate::projection::{try_project, Point3D};
use crate::surface::{RadialGradient, Rect, Surface, TextStyle};
use crate::view::ViewState;

/// Where an annotation is anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// A scene point, projected with the current view.
    Scene(Point3D),
    /// A fixed pixel offset from the viewport center.
    Screen { dx: f64, dy: f64 },
}

/// Extent of a glow fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlowExtent {
    /// Half-width and half-height around the anchor, scaled by zoom.
    Around { half_width: f64, half_height: f64 },
    /// The whole surface.
    Surface,
}

/// A 7x7 on/off cell grid drawn as squares.
pub type QrCells = [[bool; 7]; 7];

/// Decorations anchored to a point, sized relative to the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Label {
        anchor: Anchor,
        text: String,
        /// Pixel offset from the anchor before zoom scaling.
        offset: (f64, f64),
        /// Style at zoom 1; the size is multiplied by the zoom.
        style: TextStyle,
    },
    Glow {
        anchor: Anchor,
        /// Gradient radius before zoom scaling.
        radius: f64,
        color: Color,
        extent: GlowExtent,
        /// Whether radius and extent follow the zoom.
        scale_with_zoom: bool,
    },
    QrPattern {
        anchor: Anchor,
        cells: QrCells,
        /// Cell pitch before zoom scaling.
        cell_size: f64,
        /// Distance from the anchor up and left to the first cell.
        inset: f64,
        color: Color,
        opacity: f64,
    },
}

impl Annotation {
    fn anchor(&self) -> Anchor {
        match self {
            Annotation::Label { anchor, .. }
            | Annotation::Glow { anchor, .. }
            | Annotation::QrPattern { anchor, .. } => *anchor,
        }
    }

    /// Draw onto `surface`. Anchors that cannot be projected are skipped.
    pub fn draw<S: Surface + ?Sized>(&self, view: &ViewState, surface: &mut S) {
        let Some((x, y)) = resolve(self.anchor(), view) else {
            return;
        };
        let zoom = view.zoom();

        match self {
            Annotation::Label {
                text,
                offset,
                style,
                ..
            } => {
                let scaled = TextStyle {
                    size: style.size * zoom,
                    ..style.clone()
                };
                surface.fill_text(text, x + offset.0 * zoom, y + offset.1 * zoom, &scaled);
            }
            Annotation::Glow {
                radius,
                color,
                extent,
                scale_with_zoom,
                ..
            } => {
                let scale = if *scale_with_zoom { zoom } else { 1.0 };
                let gradient = RadialGradient {
                    center: (x, y),
                    radius: radius * scale,
                    inner: *color,
                    outer: color.with_alpha(0.0),
                };
                let rect = match extent {
                    GlowExtent::Around {
                        half_width,
                        half_height,
                    } => Rect::new(
                        x - half_width * scale,
                        y - half_height * scale,
                        2.0 * half_width * scale,
                        2.0 * half_height * scale,
                    ),
                    GlowExtent::Surface => {
                        let (width, height) = surface.size();
                        Rect::new(0.0, 0.0, width, height)
                    }
                };
                surface.fill_gradient_rect(rect, &gradient);
            }
            Annotation::QrPattern {
                cells,
                cell_size,
                inset,
                color,
                opacity,
                ..
            } => {
                let pitch = cell_size * zoom;
                let (left, top) = (x - inset * zoom, y - inset * zoom);
                for (row_index, row) in cells.iter().enumerate() {
                    for (col_index, &on) in row.iter().enumerate() {
                        if !on {
                            continue;
                        }
                        let rect = Rect::new(
                            left + col_index as f64 * pitch,
                            top + row_index as f64 * pitch,
                            pitch - 0.5,
                            pitch - 0.5,
                        );
                        surface.fill_rect(rect, *color, *opacity);
                    }
                }
            }
        }
    }
}

fn resolve(anchor: Anchor, view: &ViewState) -> Option<(f64, f64)> {
    match anchor {
        Anchor::Scene(point) => match try_project(&point, view) {
            Ok(screen) => Some(screen.xy()),
            Err(err) => {
                debug!(%err, "skipping annotation");
                None
            }
        },
        Anchor::Screen { dx, dy } => {
            let (cx, cy) = view.viewport_center();
            Some((cx + dx, cy + dy))
        }
    }
}
