//! Map-view interaction tools.

mod polygon_sketch;

pub use polygon_sketch::PolygonSketchTool;

use serde::{Deserialize, Serialize};

use crate::domain::geometry::{Point, Polygon};

/// Pointer buttons a tool distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// A pointer interaction, already projected into map coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(position: Point, button: PointerButton) -> Self {
        Self { position, button }
    }
}

/// Capability interface for map-view interaction tools.
///
/// The view layer forwards raw pointer gestures; a tool that finishes a
/// geometry returns it from `pointer_down`.
pub trait MapViewTool {
    /// Activates the tool on the view.
    fn begin(&mut self);

    /// Handles a button press. Returns a constructed polygon when the press
    /// completes a sketch.
    fn pointer_down(&mut self, event: PointerEvent) -> Option<Polygon>;

    /// Handles pointer movement.
    fn pointer_move(&mut self, event: PointerEvent);

    /// Handles a button release.
    fn pointer_up(&mut self, event: PointerEvent);

    /// Deactivates the tool, discarding any unfinished state.
    fn end(&mut self);
}
