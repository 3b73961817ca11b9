/// Animation driver: owns the view and runs one frame at a time
use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::input::{PointerEvent, PointerTracker};
use crate::scene::{render_frame, SceneComposer};
use crate::surface::Surface;
use crate::view::{ViewConfig, ViewDelta, ViewState};

/// Whether the user is currently dragging the scene.
///
/// Auto-rotation runs in both states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    IdleRotating,
    UserDragging,
}

/// Owns the [`ViewState`] and advances it once per display refresh.
///
/// Input only queues deltas; they are applied at the start of the next
/// frame, in arrival order.
pub struct AnimationDriver<C: SceneComposer> {
    config: ViewConfig,
    view: ViewState,
    composer: C,
    tracker: PointerTracker,
    pending: VecDeque<ViewDelta>,
    state: DriverState,
    frames: u64,
    elapsed: f64,
}

impl<C: SceneComposer> AnimationDriver<C> {
    pub fn new(config: ViewConfig, composer: C) -> Self {
        let view = ViewState::new(&config);
        Self {
            config,
            view,
            composer,
            tracker: PointerTracker::new(),
            pending: VecDeque::new(),
            state: DriverState::IdleRotating,
            frames: 0,
            elapsed: 0.0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds of animation time so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Queue a delta for the next frame.
    pub fn push_delta(&mut self, delta: ViewDelta) {
        self.pending.push_back(delta);
    }

    /// Feed a pointer event from the host.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(delta) = self.tracker.handle(event) {
            self.push_delta(delta);
        }

        let next = if self.tracker.is_dragging() {
            DriverState::UserDragging
        } else {
            DriverState::IdleRotating
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "driver state change");
            self.state = next;
        }
    }

    /// Advance the view by one frame of `dt` seconds without drawing.
    pub fn tick(&mut self, dt: f64) {
        self.view.rotate_yaw(self.config.auto_rotation);
        while let Some(delta) = self.pending.pop_front() {
            self.view.apply(delta, &self.config);
        }
        self.frames += 1;
        self.elapsed += dt.max(0.0);
    }

    /// Advance one frame and draw it onto `surface`.
    pub fn frame<S: Surface + ?Sized>(&mut self, dt: f64, surface: &mut S) {
        let (width, height) = surface.size();
        self.view.fit_viewport(width, height);
        self.tick(dt);

        let frame = self.composer.compose(&self.view, self.elapsed);
        render_frame(&frame, &self.view, surface);
        trace!(
            frame = self.frames,
            yaw = self.view.rotation_y(),
            pitch = self.view.rotation_x(),
            zoom = self.view.zoom(),
            "frame drawn"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin_scene::BinScene;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn driver() -> AnimationDriver<BinScene> {
        AnimationDriver::new(ViewConfig::default(), BinScene::new())
    }

    #[test]
    fn test_idle_frames_spin_yaw() {
        let mut driver = driver();
        let start = driver.view().rotation_y();
        for _ in 0..250 {
            driver.tick(1.0 / 60.0);
        }
        assert_eq!(driver.frames(), 250);
        assert!((driver.view().rotation_y() - (start + 250.0 * 0.004)).abs() < 1e-12);
        assert_eq!(driver.view().rotation_x(), 0.15);
    }

    #[test]
    fn test_deltas_wait_for_next_frame() {
        let mut driver = driver();
        driver.push_delta(ViewDelta::Zoom { delta: 100.0 });
        assert_eq!(driver.view().zoom(), 1.0);
        driver.tick(0.0);
        assert!((driver.view().zoom() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_deltas_clamp_in_order() {
        let mut driver = driver();
        // clamped to 0.5 first, then pulled back down
        driver.push_delta(ViewDelta::Drag { dx: 0.0, dy: 1000.0 });
        driver.push_delta(ViewDelta::Drag { dx: 0.0, dy: -20.0 });
        driver.tick(0.0);
        assert!((driver.view().rotation_x() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_drag_state_and_auto_rotation() {
        let mut driver = driver();
        assert_eq!(driver.state(), DriverState::IdleRotating);

        driver.handle_pointer(PointerEvent::Press { x: 0.0, y: 0.0 });
        assert_eq!(driver.state(), DriverState::UserDragging);

        let before = driver.view().rotation_y();
        driver.handle_pointer(PointerEvent::Move { x: 10.0, y: 0.0 });
        driver.tick(0.0);
        // drag and idle spin both apply
        assert!((driver.view().rotation_y() - (before + 0.1 + 0.004)).abs() < 1e-12);

        driver.handle_pointer(PointerEvent::Wheel { delta_y: 50.0 });
        assert_eq!(driver.state(), DriverState::UserDragging);

        driver.handle_pointer(PointerEvent::Release);
        assert_eq!(driver.state(), DriverState::IdleRotating);
    }

    #[test]
    fn test_lifting_one_pinch_finger_keeps_yaw_steady() {
        let mut driver = driver();
        driver.handle_pointer(PointerEvent::Press { x: 100.0, y: 100.0 });
        driver.handle_pointer(PointerEvent::Press { x: 100.0, y: 100.0 });
        driver.handle_pointer(PointerEvent::Pinch { distance: 150.0 });
        driver.handle_pointer(PointerEvent::Pinch { distance: 160.0 });
        driver.tick(0.0);

        let before = driver.view().rotation_y();
        driver.handle_pointer(PointerEvent::PinchEnd { x: 260.0, y: 100.0 });
        driver.handle_pointer(PointerEvent::Move { x: 261.0, y: 100.0 });
        driver.tick(0.0);
        // one pixel of drag plus the idle spin
        assert!((driver.view().rotation_y() - (before + 0.01 + 0.004)).abs() < 1e-12);
        assert_eq!(driver.state(), DriverState::UserDragging);
    }

    #[test]
    fn test_frame_fits_viewport_and_draws() {
        let mut driver = driver();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        driver.frame(1.0 / 60.0, &mut surface);
        assert_eq!(driver.view().viewport_center(), (400.0, 300.0));
        assert_eq!(surface.commands.first(), Some(&DrawCommand::Clear));
        assert_eq!(surface.fill_colors().len(), 9 * 6);
        assert!((driver.elapsed() - 1.0 / 60.0).abs() < 1e-12);
    }
}
