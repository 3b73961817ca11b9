/// bin3d Core Library - projection and face compositing for 2D surfaces
///
/// This library turns boxes described in object space into depth-sorted
/// polygons on any immediate-mode 2D surface, and drives the animated
/// smart-bin scene.

pub mod annotation;
pub mod bin_scene;
pub mod color;
pub mod driver;
pub mod geometry;
pub mod input;
pub mod painter;
pub mod projection;
pub mod scene;
pub mod surface;
pub mod view;

// Re-export commonly used types
pub use annotation::{Anchor, Annotation, GlowExtent};
pub use bin_scene::{BinKind, BinScene};
pub use color::{Color, ColorError};
pub use driver::{AnimationDriver, DriverState};
pub use geometry::{build_box, BoxDescriptor, FaceColors, FaceDescriptor, FaceSide};
pub use input::{PointerEvent, PointerTracker};
pub use painter::paint;
pub use projection::{project, try_project, Point3D, ProjectionError, ScreenPoint};
pub use scene::{render_frame, DepthOrdering, Frame, RenderPass, SceneComposer};
pub use surface::{DrawCommand, RadialGradient, Rect, RecordingSurface, Surface, TextAlign, TextStyle};
pub use view::{ViewConfig, ViewDelta, ViewState};
