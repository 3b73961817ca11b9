//! Frames, render passes and the compositing loop body.
//!
//! A [`SceneComposer`] describes one frame as an ordered list of
//! [`RenderPass`]es. [`render_frame`] clears the surface, then for each
//! pass builds the faces of its boxes, paints them in depth order and
//! draws the pass annotations on top.

use crate::annotation::Annotation;
use crate::geometry::{build_box, BoxDescriptor, FaceDescriptor};
use crate::painter::{draw_face, sort_back_to_front};
use crate::surface::Surface;
use crate::view::ViewState;

/// How faces inside a pass are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthOrdering {
    /// Every face of every box in the pass is sorted together. Needed when
    /// boxes can occlude each other.
    #[default]
    Pooled,
    /// Each box is sorted on its own and boxes are drawn in pass order.
    /// Correct only while the boxes do not overlap on screen.
    PerObject,
}

/// Boxes and annotations drawn together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPass {
    pub boxes: Vec<BoxDescriptor>,
    pub annotations: Vec<Annotation>,
    pub ordering: DepthOrdering,
    /// Pixel shift of the projection center relative to the viewport center.
    pub center_offset: (f64, f64),
}

impl RenderPass {
    pub fn new(ordering: DepthOrdering) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    pub fn with_box(mut self, descriptor: BoxDescriptor) -> Self {
        self.boxes.push(descriptor);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn offset(mut self, dx: f64, dy: f64) -> Self {
        self.center_offset = (dx, dy);
        self
    }

    /// The view this pass projects with.
    pub fn view(&self, view: &ViewState) -> ViewState {
        let (cx, cy) = view.viewport_center();
        view.recentered(cx + self.center_offset.0, cy + self.center_offset.1)
    }

    /// Projected faces of the pass, already in draw order.
    pub fn faces(&self, view: &ViewState) -> Vec<FaceDescriptor> {
        let view = self.view(view);
        match self.ordering {
            DepthOrdering::Pooled => {
                let mut faces: Vec<FaceDescriptor> = self
                    .boxes
                    .iter()
                    .flat_map(|descriptor| build_box(descriptor, &view))
                    .collect();
                sort_back_to_front(&mut faces);
                faces
            }
            DepthOrdering::PerObject => self
                .boxes
                .iter()
                .flat_map(|descriptor| {
                    let mut faces = build_box(descriptor, &view);
                    sort_back_to_front(&mut faces);
                    faces
                })
                .collect(),
        }
    }

    /// Paint the faces, then the annotations.
    pub fn draw<S: Surface + ?Sized>(&self, view: &ViewState, surface: &mut S) {
        for face in &self.faces(view) {
            draw_face(face, surface);
        }

        let view = self.view(view);
        for annotation in &self.annotations {
            annotation.draw(&view, surface);
        }
    }
}

/// Everything drawn in one refresh, in pass order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub passes: Vec<RenderPass>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pass: RenderPass) {
        self.passes.push(pass);
    }

    pub fn face_count(&self, view: &ViewState) -> usize {
        self.passes.iter().map(|pass| pass.faces(view).len()).sum()
    }
}

/// Supplies the frame to draw for a given view and time.
pub trait SceneComposer {
    /// `time` is in seconds since the driver started.
    fn compose(&self, view: &ViewState, time: f64) -> Frame;
}

/// Clear the surface and draw every pass of `frame`.
pub fn render_frame<S: Surface + ?Sized>(frame: &Frame, view: &ViewState, surface: &mut S) {
    surface.clear();
    for pass in &frame.passes {
        pass.draw(view, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::FaceColors;
    use crate::projection::Point3D;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::view::ViewConfig;
    use nalgebra::Vector3;

    fn solid(tag: u8) -> FaceColors {
        FaceColors::new([Color::rgb(tag, 0, 0); 6])
    }

    fn flat_view() -> ViewState {
        let config = ViewConfig {
            initial_yaw: 0.0,
            initial_pitch: 0.0,
            ..ViewConfig::default()
        };
        let mut view = ViewState::new(&config);
        view.fit_viewport(400.0, 400.0);
        view
    }

    /// A thin far box and a thin near box; the near one is listed first.
    fn stacked_pass(ordering: DepthOrdering) -> RenderPass {
        RenderPass::new(ordering)
            .with_box(BoxDescriptor::new(
                Point3D::new(-20.0, -20.0, -50.0),
                Vector3::new(40.0, 40.0, 1.0),
                solid(1),
            ))
            .with_box(BoxDescriptor::new(
                Point3D::new(-10.0, -10.0, 50.0),
                Vector3::new(20.0, 20.0, 1.0),
                solid(2),
            ))
    }

    #[test]
    fn test_pooled_sorts_across_boxes() {
        let faces = stacked_pass(DepthOrdering::Pooled).faces(&flat_view());
        assert_eq!(faces.len(), 12);
        // every face of the far box (depth ~50) precedes the near one (~-50)
        let first_near = faces.iter().position(|f| f.fill.r == 1).unwrap();
        assert!(faces[..first_near].iter().all(|f| f.fill.r == 2));
        assert!(faces[first_near..].iter().all(|f| f.fill.r == 1));
    }

    #[test]
    fn test_draw_follows_face_order() {
        let view = flat_view();
        for ordering in [DepthOrdering::Pooled, DepthOrdering::PerObject] {
            let pass = stacked_pass(ordering);
            let mut surface = RecordingSurface::new(400.0, 400.0);
            pass.draw(&view, &mut surface);
            let expected: Vec<Color> = pass.faces(&view).iter().map(|f| f.fill).collect();
            assert_eq!(surface.fill_colors(), expected);
        }
    }

    #[test]
    fn test_per_object_keeps_box_order() {
        let faces = stacked_pass(DepthOrdering::PerObject).faces(&flat_view());
        let tags: Vec<u8> = faces.iter().map(|f| f.fill.r).collect();
        assert_eq!(tags, vec![1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_render_frame_clears_first_and_annotations_last() {
        let pass = stacked_pass(DepthOrdering::Pooled).with_annotation(Annotation::Label {
            anchor: crate::annotation::Anchor::Scene(Point3D::origin()),
            text: "label".to_string(),
            offset: (0.0, 0.0),
            style: crate::surface::TextStyle::new(9.0, Color::WHITE),
        });
        let mut frame = Frame::new();
        frame.push(pass);

        let mut surface = RecordingSurface::new(400.0, 400.0);
        render_frame(&frame, &flat_view(), &mut surface);

        assert_eq!(surface.commands.first(), Some(&DrawCommand::Clear));
        assert!(matches!(
            surface.commands.last(),
            Some(DrawCommand::FillText { .. })
        ));
        // fill + stroke per face
        assert_eq!(surface.commands.len(), 1 + 12 * 2 + 1);
    }

    #[test]
    fn test_pass_offset_moves_projection_center() {
        let pass = RenderPass::new(DepthOrdering::Pooled).offset(0.0, 60.0);
        let view = pass.view(&flat_view());
        assert_eq!(view.viewport_center(), (200.0, 260.0));
    }
}
