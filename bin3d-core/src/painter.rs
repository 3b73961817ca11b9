/// Painter's algorithm: back-to-front face drawing
use tracing::debug;

use crate::color::Color;
use crate::geometry::FaceDescriptor;
use crate::surface::Surface;

/// Outline drawn around every face.
pub const EDGE_COLOR: Color = Color::rgba(0, 255, 136, 0.13);
pub const EDGE_WIDTH: f64 = 0.8;

/// Sort faces so the farthest (largest average depth) comes first.
///
/// The sort is stable: equal depths keep their input order.
pub fn sort_back_to_front(faces: &mut [FaceDescriptor]) {
    faces.sort_by(|a, b| {
        let da = a.average_depth().unwrap_or(f64::NEG_INFINITY);
        let db = b.average_depth().unwrap_or(f64::NEG_INFINITY);
        db.total_cmp(&da)
    });
}

/// Draw a single face: fill, then a faint outline.
///
/// Faces with fewer than three points are skipped.
pub fn draw_face<S: Surface + ?Sized>(face: &FaceDescriptor, surface: &mut S) {
    if face.points.len() < 3 {
        debug!(points = face.points.len(), "skipping degenerate face");
        return;
    }

    let outline: Vec<(f64, f64)> = face.points.iter().map(|p| p.xy()).collect();
    surface.fill_polygon(&outline, face.fill, face.opacity());
    surface.stroke_polygon(&outline, EDGE_COLOR, EDGE_WIDTH);
}

/// Depth-sort `faces` and draw them back to front.
pub fn paint<S: Surface + ?Sized>(mut faces: Vec<FaceDescriptor>, surface: &mut S) {
    sort_back_to_front(&mut faces);
    for face in &faces {
        draw_face(face, surface);
    }
}
