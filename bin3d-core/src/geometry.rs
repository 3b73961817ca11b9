/// Box descriptors and the faces built from them
use nalgebra::Vector3;
use tracing::debug;

use crate::color::Color;
use crate::projection::{try_project, Point3D, ScreenPoint};
use crate::view::ViewState;

/// Which side of a box a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSide {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl FaceSide {
    pub const ALL: [FaceSide; 6] = [
        FaceSide::Front,
        FaceSide::Back,
        FaceSide::Left,
        FaceSide::Right,
        FaceSide::Top,
        FaceSide::Bottom,
    ];

    /// Corner indices tracing this face's perimeter.
    ///
    /// Corners 0-3 lie on the `z` plane and 4-7 on `z + depth`, each set
    /// ordered (x, y), (x + w, y), (x + w, y + h), (x, y + h).
    pub const fn corners(self) -> [usize; 4] {
        match self {
            FaceSide::Front => [4, 5, 6, 7],
            FaceSide::Back => [0, 1, 2, 3],
            FaceSide::Left => [0, 4, 7, 3],
            FaceSide::Right => [1, 5, 6, 2],
            FaceSide::Top => [0, 1, 5, 4],
            FaceSide::Bottom => [3, 2, 6, 7],
        }
    }
}

/// Per-side fill colors. A missing color hides that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceColors {
    pub front: Option<Color>,
    pub back: Option<Color>,
    pub left: Option<Color>,
    pub right: Option<Color>,
    pub top: Option<Color>,
    pub bottom: Option<Color>,
}

impl FaceColors {
    /// One color per side, in [`FaceSide::ALL`] order.
    pub fn new(colors: [Color; 6]) -> Self {
        let [front, back, left, right, top, bottom] = colors.map(Some);
        Self {
            front,
            back,
            left,
            right,
            top,
            bottom,
        }
    }

    /// Front, back, both sides, top, bottom.
    pub fn from_five([front, back, sides, top, bottom]: [Color; 5]) -> Self {
        Self::new([front, back, sides, sides, top, bottom])
    }

    /// Parse five CSS hex strings (front, back, sides, top, bottom).
    ///
    /// An unparsable entry leaves its side(s) without a color.
    pub fn from_hex_five(colors: [&str; 5]) -> Self {
        let [front, back, sides, top, bottom] = colors.map(|hex| match Color::from_hex_str(hex) {
            Ok(color) => Some(color),
            Err(err) => {
                debug!(%err, "ignoring face color");
                None
            }
        });
        Self {
            front,
            back,
            left: sides,
            right: sides,
            top,
            bottom,
        }
    }

    pub fn get(&self, side: FaceSide) -> Option<Color> {
        match side {
            FaceSide::Front => self.front,
            FaceSide::Back => self.back,
            FaceSide::Left => self.left,
            FaceSide::Right => self.right,
            FaceSide::Top => self.top,
            FaceSide::Bottom => self.bottom,
        }
    }
}

/// An axis-aligned box to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDescriptor {
    pub origin: Point3D,
    /// Width, height, depth.
    pub size: Vector3<f64>,
    pub colors: FaceColors,
}

impl BoxDescriptor {
    pub fn new(origin: Point3D, size: Vector3<f64>, colors: FaceColors) -> Self {
        Self {
            origin,
            size,
            colors,
        }
    }

    /// The eight corners, in the order [`FaceSide::corners`] refers to.
    pub fn corners(&self) -> [Point3D; 8] {
        let o = self.origin;
        let (w, h, d) = (self.size.x, self.size.y, self.size.z);
        [
            Point3D::new(o.x, o.y, o.z),
            Point3D::new(o.x + w, o.y, o.z),
            Point3D::new(o.x + w, o.y + h, o.z),
            Point3D::new(o.x, o.y + h, o.z),
            Point3D::new(o.x, o.y, o.z + d),
            Point3D::new(o.x + w, o.y, o.z + d),
            Point3D::new(o.x + w, o.y + h, o.z + d),
            Point3D::new(o.x, o.y + h, o.z + d),
        ]
    }
}

/// A projected polygon ready for the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDescriptor {
    pub points: Vec<ScreenPoint>,
    pub fill: Color,
    /// Opacity applied on top of the fill color, 1.0 when unset.
    pub alpha: Option<f64>,
}

impl FaceDescriptor {
    pub fn new(points: Vec<ScreenPoint>, fill: Color) -> Self {
        Self {
            points,
            fill,
            alpha: None,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn opacity(&self) -> f64 {
        self.alpha.unwrap_or(1.0)
    }

    /// Mean depth of the points, `None` for an empty face.
    pub fn average_depth(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(ScreenPoint::depth).sum();
        Some(sum / self.points.len() as f64)
    }
}

/// Project a box and assemble its faces in [`FaceSide::ALL`] order.
///
/// Sides without a color, and sides touching a corner that cannot be
/// projected, are left out.
pub fn build_box(descriptor: &BoxDescriptor, view: &ViewState) -> Vec<FaceDescriptor> {
    let projected = descriptor
        .corners()
        .map(|corner| match try_project(&corner, view) {
            Ok(point) => Some(point),
            Err(err) => {
                debug!(%err, ?corner, "corner not projectable");
                None
            }
        });

    FaceSide::ALL
        .iter()
        .filter_map(|&side| {
            let fill = descriptor.colors.get(side)?;
            let points = side
                .corners()
                .iter()
                .map(|&i| projected[i])
                .collect::<Option<Vec<_>>>();
            match points {
                Some(points) => Some(FaceDescriptor::new(points, fill)),
                None => {
                    debug!(?side, "skipping face with degenerate corner");
                    None
                }
            }
        })
        .collect()
}
