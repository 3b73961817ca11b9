/// Perspective projection of scene points onto the drawing surface
use nalgebra::{Point3, Rotation3, Vector3};
use thiserror::Error;

use crate::view::ViewState;

/// A point in object space.
pub type Point3D = Point3<f64>;

/// Smallest perspective denominator still considered in front of the camera.
const MIN_DENOMINATOR: f64 = 1e-6;

/// A projected point: pixel coordinates plus the rotated, pre-divide z.
///
/// Only the projector creates these; `depth` is used for ordering and
/// never drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    sx: f64,
    sy: f64,
    depth: f64,
}

impl ScreenPoint {
    pub(crate) fn new(sx: f64, sy: f64, depth: f64) -> Self {
        Self { sx, sy, depth }
    }

    pub fn sx(&self) -> f64 {
        self.sx
    }

    pub fn sy(&self) -> f64 {
        self.sy
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Pixel coordinates as a tuple.
    pub fn xy(&self) -> (f64, f64) {
        (self.sx, self.sy)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("point lies behind the camera (perspective denominator {denominator})")]
    BehindCamera { denominator: f64 },
    #[error("projection produced a non-finite coordinate")]
    NonFinite,
}

/// Rotate a point by yaw then pitch, returning the rotated coordinates.
pub fn rotate(point: &Point3D, view: &ViewState) -> Vector3<f64> {
    // Yaw turns +x towards -z, which is the inverse of nalgebra's sense
    // around +y; pitch matches nalgebra around +x.
    let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), -view.rotation_y());
    let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), view.rotation_x());
    pitch * (yaw * point.coords)
}

fn perspective_denominator(rotated_z: f64, view: &ViewState) -> f64 {
    view.fov() + rotated_z + view.camera_offset()
}

/// Project a point. Total over finite input; see [`try_project`] for a
/// variant that rejects points behind the camera.
pub fn project(point: &Point3D, view: &ViewState) -> ScreenPoint {
    let rotated = rotate(point, view);
    let depth_factor = view.fov() / perspective_denominator(rotated.z, view);
    let (cx, cy) = view.viewport_center();
    ScreenPoint::new(
        cx + rotated.x * depth_factor * view.zoom(),
        cy + rotated.y * depth_factor * view.zoom(),
        rotated.z,
    )
}

/// Project a point, failing when the perspective divide degenerates.
pub fn try_project(point: &Point3D, view: &ViewState) -> Result<ScreenPoint, ProjectionError> {
    let rotated = rotate(point, view);
    let denominator = perspective_denominator(rotated.z, view);
    if !(denominator > MIN_DENOMINATOR) {
        return Err(ProjectionError::BehindCamera { denominator });
    }

    let screen = project(point, view);
    if !(screen.sx.is_finite() && screen.sy.is_finite() && screen.depth.is_finite()) {
        return Err(ProjectionError::NonFinite);
    }
    Ok(screen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ViewConfig, ViewDelta};

    fn flat_view() -> ViewState {
        let config = ViewConfig {
            initial_yaw: 0.0,
            initial_pitch: 0.0,
            initial_zoom: 1.0,
            ..ViewConfig::default()
        };
        let mut view = ViewState::new(&config);
        view.fit_viewport(800.0, 600.0);
        view
    }

    #[test]
    fn test_origin_projects_to_center() {
        let view = flat_view();
        let p = project(&Point3D::origin(), &view);
        assert_eq!(p.xy(), (400.0, 300.0));
        assert_eq!(p.depth(), 0.0);
    }

    #[test]
    fn test_unrotated_perspective() {
        let view = flat_view();
        // depth factor at z = 0 is 380 / 680
        let p = project(&Point3D::new(68.0, -34.0, 0.0), &view);
        assert!((p.sx() - (400.0 + 38.0)).abs() < 1e-9);
        assert!((p.sy() - (300.0 - 19.0)).abs() < 1e-9);

        // farther points shrink towards the center
        let far = project(&Point3D::new(68.0, 0.0, 100.0), &view);
        assert!(far.sx() < p.sx());
        assert_eq!(far.depth(), 100.0);
    }

    #[test]
    fn test_rotation_matches_closed_form() {
        let config = ViewConfig::default();
        let mut view = flat_view();
        view.apply(ViewDelta::Drag { dx: 37.0, dy: 41.0 }, &config);
        let (ry, rx) = (view.rotation_y(), view.rotation_x());
        let (x, y, z) = (12.0, -7.0, 30.0);

        let x1 = x * ry.cos() - z * ry.sin();
        let z1 = x * ry.sin() + z * ry.cos();
        let y2 = y * rx.cos() - z1 * rx.sin();
        let z2 = y * rx.sin() + z1 * rx.cos();
        let d = 380.0 / (380.0 + z2 + 300.0);

        let p = project(&Point3D::new(x, y, z), &view);
        assert!((p.sx() - (400.0 + x1 * d)).abs() < 1e-9);
        assert!((p.sy() - (300.0 + y2 * d)).abs() < 1e-9);
        assert!((p.depth() - z2).abs() < 1e-9);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let view = ViewState::default();
        let point = Point3D::new(-165.0, 50.0, -30.0);
        assert_eq!(project(&point, &view), project(&point, &view));
    }

    #[test]
    fn test_zoom_scales_offsets() {
        let config = ViewConfig::default();
        let mut view = flat_view();
        let near = project(&Point3D::new(100.0, 0.0, 0.0), &view);
        view.set_zoom(1.5, &config);
        let zoomed = project(&Point3D::new(100.0, 0.0, 0.0), &view);
        assert!(((zoomed.sx() - 400.0) - (near.sx() - 400.0) * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let view = flat_view();
        let err = try_project(&Point3D::new(0.0, 0.0, -680.0), &view).unwrap_err();
        assert!(matches!(err, ProjectionError::BehindCamera { .. }));
        assert!(try_project(&Point3D::new(0.0, 0.0, -900.0), &view).is_err());
        assert!(try_project(&Point3D::new(5.0, 5.0, 5.0), &view).is_ok());
    }
}
