/// The smart-bin scene: base, three bins, pole and QR status screen
use nalgebra::Vector3;

use crate::annotation::{Anchor, Annotation, GlowExtent, QrCells};
use crate::color::Color;
use crate::geometry::{BoxDescriptor, FaceColors};
use crate::projection::Point3D;
use crate::scene::{DepthOrdering, Frame, RenderPass, SceneComposer};
use crate::surface::TextStyle;
use crate::view::ViewState;

/// Vertical shift of the scene below the viewport center, in pixels.
const SCENE_DROP: f64 = 60.0;

const BIN_WIDTH: f64 = 90.0;
const BIN_HEIGHT: f64 = 140.0;
const BIN_DEPTH: f64 = 60.0;
const BIN_BASE_Y: f64 = 50.0;

const LABEL_FONT: &str = "Kanit";
const SCREEN_FONT: &str = "Space Mono";

const QR_PATTERN: [[u8; 7]; 7] = [
    [1, 1, 1, 0, 1, 1, 1],
    [1, 0, 1, 0, 1, 0, 1],
    [1, 1, 1, 1, 0, 0, 0],
    [0, 1, 0, 0, 1, 1, 0],
    [0, 0, 1, 1, 0, 1, 0],
    [1, 0, 1, 0, 1, 0, 1],
    [1, 1, 0, 0, 1, 1, 1],
];

/// Waste stream a bin collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinKind {
    Organic,
    Recycle,
    General,
}

/// Colors of one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinPalette {
    pub front: Color,
    pub body: Color,
    pub lid: Color,
}

impl BinKind {
    pub const ALL: [BinKind; 3] = [BinKind::Organic, BinKind::Recycle, BinKind::General];

    pub fn palette(self) -> BinPalette {
        match self {
            BinKind::Organic => BinPalette {
                front: Color::rgb(0x22, 0x66, 0x28),
                body: Color::rgb(0x1a, 0x4d, 0x1e),
                lid: Color::rgb(0x2d, 0x7a, 0x33),
            },
            BinKind::Recycle => BinPalette {
                front: Color::rgb(0x1a, 0x3d, 0x7a),
                body: Color::rgb(0x0d, 0x2b, 0x4d),
                lid: Color::rgb(0x15, 0x65, 0xc0),
            },
            BinKind::General => BinPalette {
                front: Color::rgb(0x6b, 0x45, 0x00),
                body: Color::rgb(0x4d, 0x33, 0x00),
                lid: Color::rgb(0x8a, 0x5f, 0x00),
            },
        }
    }

    /// Left edge of the bin body along x.
    pub fn x(self) -> f64 {
        match self {
            BinKind::Organic => -165.0,
            BinKind::Recycle => -35.0,
            BinKind::General => 95.0,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            BinKind::Organic => "🍃",
            BinKind::Recycle => "♻️",
            BinKind::General => "🗑️",
        }
    }

    /// Caption printed under the emoji.
    pub fn caption(self) -> &'static str {
        match self {
            BinKind::Organic => "อินทรีย์",
            BinKind::Recycle => "รีไซเคิล",
            BinKind::General => "ทั่วไป",
        }
    }
}

/// Composes the bin scene. Stateless; the QR pulse follows `time`.
#[derive(Debug, Clone, Default)]
pub struct BinScene;

impl BinScene {
    pub fn new() -> Self {
        Self
    }

    fn ground_glow() -> RenderPass {
        RenderPass::new(DepthOrdering::PerObject).with_annotation(Annotation::Glow {
            anchor: Anchor::Screen { dx: 0.0, dy: 110.0 },
            radius: 200.0,
            color: Color::rgba(0, 255, 136, 0.035),
            extent: GlowExtent::Surface,
            scale_with_zoom: false,
        })
    }

    fn base() -> RenderPass {
        RenderPass::new(DepthOrdering::PerObject)
            .offset(0.0, SCENE_DROP)
            .with_box(BoxDescriptor::new(
                Point3D::new(-175.0, 192.0, -58.0),
                Vector3::new(350.0, 16.0, 116.0),
                FaceColors::from_hex_five(["#1a2b1d", "#0d1a0f", "#111a14", "#222", "#0a0f0d"]),
            ))
    }

    fn bin(kind: BinKind) -> RenderPass {
        let palette = kind.palette();
        let bx = kind.x();
        let lid_side = palette.lid.lighten(40);

        let body = BoxDescriptor::new(
            Point3D::new(bx, BIN_BASE_Y, -BIN_DEPTH / 2.0),
            Vector3::new(BIN_WIDTH, BIN_HEIGHT, BIN_DEPTH),
            FaceColors::from_five([
                palette.front,
                palette.body,
                palette.body,
                palette.body,
                Color::rgb(0x11, 0x11, 0x11),
            ]),
        );
        let lid = BoxDescriptor::new(
            Point3D::new(bx - 4.0, BIN_BASE_Y - 22.0, -BIN_DEPTH / 2.0 - 4.0),
            Vector3::new(BIN_WIDTH + 8.0, 20.0, BIN_DEPTH + 8.0),
            FaceColors::from_five([
                palette.lid,
                palette.lid,
                lid_side,
                lid_side,
                Color::rgb(0x0a, 0x0f, 0x0d),
            ]),
        );

        let label_anchor = Anchor::Scene(Point3D::new(
            bx + BIN_WIDTH / 2.0,
            BIN_BASE_Y + BIN_HEIGHT / 2.0,
            BIN_DEPTH / 2.0,
        ));

        RenderPass::new(DepthOrdering::PerObject)
            .offset(0.0, SCENE_DROP)
            .with_box(body)
            .with_box(lid)
            .with_annotation(Annotation::Label {
                anchor: label_anchor,
                text: kind.emoji().to_string(),
                offset: (0.0, -10.0),
                style: TextStyle::new(15.0, Color::rgba(255, 255, 255, 0.9))
                    .bold()
                    .family(LABEL_FONT),
            })
            .with_annotation(Annotation::Label {
                anchor: label_anchor,
                text: kind.caption().to_string(),
                offset: (0.0, 10.0),
                style: TextStyle::new(9.0, Color::rgba(255, 255, 255, 0.55)).family(LABEL_FONT),
            })
    }

    fn pole() -> RenderPass {
        RenderPass::new(DepthOrdering::PerObject)
            .offset(0.0, SCENE_DROP)
            .with_box(BoxDescriptor::new(
                Point3D::new(-7.0, -125.0, -5.0),
                Vector3::new(14.0, 330.0, 10.0),
                FaceColors::from_hex_five(["#1a2b1d", "#0d1a0f", "#111", "#1e3020", "#0a0f0d"]),
            ))
    }

    fn screen(time: f64) -> RenderPass {
        let center = Anchor::Scene(Point3D::new(0.0, -69.0, -7.0));
        RenderPass::new(DepthOrdering::PerObject)
            .offset(0.0, SCENE_DROP)
            .with_box(BoxDescriptor::new(
                Point3D::new(-40.0, -95.0, -18.0),
                Vector3::new(80.0, 52.0, 10.0),
                FaceColors::from_hex_five(["#0a1f0d", "#061209", "#051008", "#0a1f0d", "#030908"]),
            ))
            .with_annotation(Annotation::Glow {
                anchor: center,
                radius: 38.0,
                color: Color::rgba(0, 255, 136, 0.28),
                extent: GlowExtent::Around {
                    half_width: 42.0,
                    half_height: 32.0,
                },
                scale_with_zoom: true,
            })
            .with_annotation(Annotation::QrPattern {
                anchor: center,
                cells: qr_cells(),
                cell_size: 3.8,
                inset: 14.0,
                color: Color::rgb(0x00, 0xff, 0x88),
                opacity: qr_pulse(time),
            })
            .with_annotation(Annotation::Label {
                anchor: center,
                text: "SCAN ME".to_string(),
                offset: (0.0, 19.0),
                style: TextStyle::new(6.5, Color::rgba(0, 255, 136, 0.65)).family(SCREEN_FONT),
            })
    }
}

/// QR opacity at `time` seconds, pulsing in `[0.5, 1.0]`.
pub fn qr_pulse(time: f64) -> f64 {
    0.75 + 0.25 * (time * 3.0).sin()
}

fn qr_cells() -> QrCells {
    QR_PATTERN.map(|row| row.map(|cell| cell == 1))
}

impl SceneComposer for BinScene {
    fn compose(&self, _view: &ViewState, time: f64) -> Frame {
        let mut frame = Frame::new();
        frame.push(Self::ground_glow());
        frame.push(Self::base());
        for kind in BinKind::ALL {
            frame.push(Self::bin(kind));
        }
        frame.push(Self::pole());
        frame.push(Self::screen(time));
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::render_frame;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn view() -> ViewState {
        let mut view = ViewState::default();
        view.fit_viewport(640.0, 480.0);
        view
    }

    #[test]
    fn test_frame_layout() {
        let frame = BinScene::new().compose(&view(), 0.0);
        // glow, base, three bins, pole, screen
        assert_eq!(frame.passes.len(), 7);
        assert!(frame.passes[0].boxes.is_empty());
        assert_eq!(frame.passes[2].boxes.len(), 2);
        assert_eq!(frame.passes[6].annotations.len(), 3);
        // 1 base + 6 bin boxes + pole + screen, six faces each
        assert_eq!(frame.face_count(&view()), 9 * 6);
    }

    #[test]
    fn test_lid_sides_are_lightened() {
        let frame = BinScene::new().compose(&view(), 0.0);
        let lid = &frame.passes[2].boxes[1];
        assert_eq!(lid.colors.left, Some(Color::rgb(0x2d + 40, 0x7a + 40, 0x33 + 40)));
        assert_eq!(lid.colors.front, Some(Color::rgb(0x2d, 0x7a, 0x33)));
    }

    #[test]
    fn test_short_hex_colors_resolve() {
        let frame = BinScene::new().compose(&view(), 0.0);
        let base = &frame.passes[1].boxes[0];
        assert_eq!(base.colors.top, Some(Color::rgb(0x22, 0x22, 0x22)));
    }

    #[test]
    fn test_qr_pulse_range() {
        for step in 0..200 {
            let alpha = qr_pulse(step as f64 * 0.05);
            assert!((0.5..=1.0).contains(&alpha));
        }
        assert_eq!(qr_pulse(0.0), 0.75);
    }

    #[test]
    fn test_render_draws_labels_and_qr() {
        let mut surface = RecordingSurface::new(640.0, 480.0);
        let view = view();
        render_frame(&BinScene::new().compose(&view, 1.0), &view, &mut surface);

        let texts = surface.texts();
        assert_eq!(
            texts,
            vec!["🍃", "อินทรีย์", "♻️", "รีไซเคิล", "🗑️", "ทั่วไป", "SCAN ME"]
        );
        let qr_cells = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        let lit = QR_PATTERN.iter().flatten().filter(|&&c| c == 1).count();
        assert_eq!(qr_cells, lit);
    }
}
