/// View state (rotation, zoom, viewport center) and its tunables
use std::ops::RangeInclusive;

/// Tunables for projection, input sensitivity and clamping.
///
/// `Default` holds the values the bin scene was designed around.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Perspective strength; larger values flatten the scene.
    pub fov: f64,
    /// Distance from the camera to the scene origin along z.
    pub camera_offset: f64,
    /// Yaw added every frame, in radians.
    pub auto_rotation: f64,
    /// Radians of yaw per horizontal drag pixel.
    pub yaw_sensitivity: f64,
    /// Radians of pitch per vertical drag pixel.
    pub pitch_sensitivity: f64,
    /// Zoom change per wheel unit.
    pub zoom_sensitivity: f64,
    pub pitch_limits: RangeInclusive<f64>,
    pub zoom_limits: RangeInclusive<f64>,
    pub initial_yaw: f64,
    pub initial_pitch: f64,
    pub initial_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov: 380.0,
            camera_offset: 300.0,
            auto_rotation: 0.004,
            yaw_sensitivity: 0.01,
            pitch_sensitivity: 0.005,
            zoom_sensitivity: 0.001,
            pitch_limits: -0.4..=0.5,
            zoom_limits: 0.7..=1.5,
            initial_yaw: -0.4,
            initial_pitch: 0.15,
            initial_zoom: 1.0,
        }
    }
}

/// A single input-driven change to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewDelta {
    /// Pointer movement in surface pixels while dragging.
    Drag { dx: f64, dy: f64 },
    /// Wheel units; positive zooms out.
    Zoom { delta: f64 },
}

/// Rotation, zoom and viewport center of the scene.
///
/// Fields are private so pitch and zoom can only change through the
/// clamping setters below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    rotation_y: f64,
    rotation_x: f64,
    zoom: f64,
    viewport_center: (f64, f64),
    fov: f64,
    camera_offset: f64,
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        let mut state = Self {
            rotation_y: config.initial_yaw,
            rotation_x: 0.0,
            zoom: 1.0,
            viewport_center: (0.0, 0.0),
            fov: config.fov,
            camera_offset: config.camera_offset,
        };
        state.set_pitch(config.initial_pitch, config);
        state.set_zoom(config.initial_zoom, config);
        state
    }

    /// Yaw in radians. Unbounded.
    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    /// Pitch in radians, always within the configured limits.
    pub fn rotation_x(&self) -> f64 {
        self.rotation_x
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn viewport_center(&self) -> (f64, f64) {
        self.viewport_center
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn camera_offset(&self) -> f64 {
        self.camera_offset
    }

    /// Recenter on a surface of the given size.
    pub fn fit_viewport(&mut self, width: f64, height: f64) {
        self.viewport_center = (width / 2.0, height / 2.0);
    }

    /// Copy of this view centered elsewhere, used to place a scene
    /// relative to the surface center.
    pub fn recentered(&self, cx: f64, cy: f64) -> Self {
        Self {
            viewport_center: (cx, cy),
            ..*self
        }
    }

    pub fn rotate_yaw(&mut self, radians: f64) {
        self.rotation_y += radians;
    }

    pub fn set_pitch(&mut self, radians: f64, config: &ViewConfig) {
        self.rotation_x = clamp_to(radians, &config.pitch_limits);
    }

    pub fn set_zoom(&mut self, zoom: f64, config: &ViewConfig) {
        self.zoom = clamp_to(zoom, &config.zoom_limits);
    }

    /// Apply one input delta, converting pixels and wheel units with the
    /// configured sensitivities.
    pub fn apply(&mut self, delta: ViewDelta, config: &ViewConfig) {
        match delta {
            ViewDelta::Drag { dx, dy } => {
                self.rotate_yaw(dx * config.yaw_sensitivity);
                self.set_pitch(self.rotation_x + dy * config.pitch_sensitivity, config);
            }
            ViewDelta::Zoom { delta } => {
                self.set_zoom(self.zoom - delta * config.zoom_sensitivity, config);
            }
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

fn clamp_to(value: f64, limits: &RangeInclusive<f64>) -> f64 {
    // Limits may be given in either order
    let (a, b) = (*limits.start(), *limits.end());
    let (low, high) = (a.min(b), a.max(b));
    if low.is_nan() {
        return value;
    }
    // NaN input keeps the state inside the limits
    if value.is_nan() {
        return low;
    }
    value.clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ViewState::default();
        assert_eq!(state.rotation_y(), -0.4);
        assert_eq!(state.rotation_x(), 0.15);
        assert_eq!(state.zoom(), 1.0);
    }

    #[test]
    fn test_drag_converts_pixels() {
        let config = ViewConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(ViewDelta::Drag { dx: 10.0, dy: -10.0 }, &config);
        assert!((state.rotation_y() - (-0.4 + 0.1)).abs() < 1e-12);
        assert!((state.rotation_x() - (0.15 - 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_and_zoom_stay_clamped() {
        let config = ViewConfig::default();
        let mut state = ViewState::new(&config);
        let deltas = [
            ViewDelta::Drag { dx: 0.0, dy: 1e6 },
            ViewDelta::Zoom { delta: -1e6 },
            ViewDelta::Drag { dx: 3.0, dy: -250.0 },
            ViewDelta::Zoom { delta: 900.0 },
            ViewDelta::Drag { dx: 0.0, dy: -1e9 },
            ViewDelta::Zoom { delta: f64::NAN },
            ViewDelta::Drag { dx: 0.0, dy: 17.0 },
        ];
        for delta in deltas {
            state.apply(delta, &config);
            assert!(config.pitch_limits.contains(&state.rotation_x()));
            assert!(config.zoom_limits.contains(&state.zoom()));
        }
    }

    #[test]
    fn test_wheel_zooms_out_on_positive_delta() {
        let config = ViewConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(ViewDelta::Zoom { delta: 100.0 }, &config);
        assert!((state.zoom() - 0.9).abs() < 1e-12);
        state.apply(ViewDelta::Zoom { delta: 1000.0 }, &config);
        assert_eq!(state.zoom(), 0.7);
    }

    #[test]
    fn test_inverted_limits_still_clamp() {
        let config = ViewConfig {
            pitch_limits: 0.5..=-0.4,
            zoom_limits: 1.5..=0.7,
            ..ViewConfig::default()
        };
        let mut state = ViewState::new(&config);
        state.set_pitch(2.0, &config);
        assert_eq!(state.rotation_x(), 0.5);
        state.set_pitch(-2.0, &config);
        assert_eq!(state.rotation_x(), -0.4);
        state.set_zoom(0.1, &config);
        assert_eq!(state.zoom(), 0.7);
        state.set_zoom(f64::NAN, &config);
        assert_eq!(state.zoom(), 0.7);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let config = ViewConfig::default();
        let mut state = ViewState::new(&config);
        state.apply(ViewDelta::Drag { dx: 10_000.0, dy: 0.0 }, &config);
        assert!((state.rotation_y() - 99.6).abs() < 1e-9);
    }

    #[test]
    fn test_fit_viewport() {
        let mut state = ViewState::default();
        state.fit_viewport(640.0, 480.0);
        assert_eq!(state.viewport_center(), (320.0, 240.0));
        assert_eq!(state.recentered(1.0, 2.0).viewport_center(), (1.0, 2.0));
    }
}
