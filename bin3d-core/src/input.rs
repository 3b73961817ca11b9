/// Pointer, wheel and pinch input translated into view deltas
use crate::view::ViewDelta;

/// Raw input as delivered by a host, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button or first touch went down.
    Press { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release,
    /// Wheel movement; positive zooms out.
    Wheel { delta_y: f64 },
    /// Distance between two touches.
    Pinch { distance: f64 },
    /// The second touch went away; `x`, `y` is the touch still down.
    PinchEnd { x: f64, y: f64 },
}

/// Turns absolute pointer positions into drag deltas.
///
/// Moves are ignored unless a press is active, like a mouse drag.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last: Option<(f64, f64)>,
    pinch: Option<f64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    /// Feed one event, returning the delta it produces, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<ViewDelta> {
        match event {
            PointerEvent::Press { x, y } => {
                self.last = Some((x, y));
                None
            }
            PointerEvent::Move { x, y } => {
                let (last_x, last_y) = self.last?;
                self.last = Some((x, y));
                Some(ViewDelta::Drag {
                    dx: x - last_x,
                    dy: y - last_y,
                })
            }
            PointerEvent::Release => {
                self.last = None;
                self.pinch = None;
                None
            }
            PointerEvent::Wheel { delta_y } => Some(ViewDelta::Zoom { delta: delta_y }),
            PointerEvent::Pinch { distance } => {
                let previous = self.pinch.replace(distance)?;
                // Spreading the fingers zooms in, like a negative wheel delta
                Some(ViewDelta::Zoom {
                    delta: previous - distance,
                })
            }
            PointerEvent::PinchEnd { x, y } => {
                self.pinch = None;
                // The next move is measured from the remaining finger
                if self.last.is_some() {
                    self.last = Some((x, y));
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.handle(PointerEvent::Move { x: 5.0, y: 5.0 }), None);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_drag_reports_relative_motion() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Press { x: 10.0, y: 10.0 });
        assert!(tracker.is_dragging());
        assert_eq!(
            tracker.handle(PointerEvent::Move { x: 15.0, y: 7.0 }),
            Some(ViewDelta::Drag { dx: 5.0, dy: -3.0 })
        );
        assert_eq!(
            tracker.handle(PointerEvent::Move { x: 16.0, y: 7.0 }),
            Some(ViewDelta::Drag { dx: 1.0, dy: 0.0 })
        );
        tracker.handle(PointerEvent::Release);
        assert_eq!(tracker.handle(PointerEvent::Move { x: 0.0, y: 0.0 }), None);
    }

    #[test]
    fn test_wheel_passes_through() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.handle(PointerEvent::Wheel { delta_y: -120.0 }),
            Some(ViewDelta::Zoom { delta: -120.0 })
        );
    }

    #[test]
    fn test_pinch_spread_zooms_in() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.handle(PointerEvent::Pinch { distance: 100.0 }), None);
        assert_eq!(
            tracker.handle(PointerEvent::Pinch { distance: 130.0 }),
            Some(ViewDelta::Zoom { delta: -30.0 })
        );
        tracker.handle(PointerEvent::PinchEnd { x: 0.0, y: 0.0 });
        assert_eq!(tracker.handle(PointerEvent::Pinch { distance: 50.0 }), None);
    }

    #[test]
    fn test_pinch_end_reanchors_drag() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::Press { x: 100.0, y: 100.0 });
        tracker.handle(PointerEvent::Pinch { distance: 150.0 });
        tracker.handle(PointerEvent::Pinch { distance: 160.0 });
        // the first finger lifts; the one left is at (260, 100)
        tracker.handle(PointerEvent::PinchEnd { x: 260.0, y: 100.0 });
        assert!(tracker.is_dragging());
        assert_eq!(
            tracker.handle(PointerEvent::Move { x: 261.0, y: 100.0 }),
            Some(ViewDelta::Drag { dx: 1.0, dy: 0.0 })
        );
    }

    #[test]
    fn test_pinch_end_without_press_does_not_start_drag() {
        let mut tracker = PointerTracker::new();
        tracker.handle(PointerEvent::PinchEnd { x: 5.0, y: 5.0 });
        assert!(!tracker.is_dragging());
    }
}
