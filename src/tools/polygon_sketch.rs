//! Freehand polygon sketching.

use tracing::trace;

use crate::domain::geometry::{Polygon, PolygonBuilder, SpatialReference};

use super::{MapViewTool, PointerButton, PointerEvent};

/// Sketches a polygon one vertex per primary-button press.
///
/// A secondary-button press finishes the sketch: with more than two captured
/// vertices the polygon is constructed and returned, otherwise the sketch is
/// simply discarded. A preview of the ring so far is maintained once it has
/// enough vertices to close.
pub struct PolygonSketchTool {
    builder: PolygonBuilder,
    preview: Option<Polygon>,
}

impl PolygonSketchTool {
    pub fn new(spatial_reference: SpatialReference) -> Self {
        Self {
            builder: PolygonBuilder::new(spatial_reference),
            preview: None,
        }
    }

    /// The ring sketched so far, once it can form a polygon.
    pub fn preview(&self) -> Option<&Polygon> {
        self.preview.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.builder.vertex_count()
    }

    fn clear_sketch(&mut self) {
        self.builder.clear();
        self.preview = None;
    }
}

impl MapViewTool for PolygonSketchTool {
    fn begin(&mut self) {
        self.clear_sketch();
    }

    fn pointer_down(&mut self, event: PointerEvent) -> Option<Polygon> {
        trace!(position = ?event.position, "pointer pressed");

        if event.button == PointerButton::Secondary {
            let constructed = if self.builder.vertex_count() > 2 {
                Some(self.builder.to_polygon())
            } else {
                None
            };
            self.clear_sketch();
            return constructed;
        }

        self.builder.add_vertex(event.position);
        None
    }

    fn pointer_move(&mut self, event: PointerEvent) {
        trace!(position = ?event.position, "pointer moved");
    }

    fn pointer_up(&mut self, _event: PointerEvent) {
        if self.builder.vertex_count() > 2 {
            self.preview = Some(self.builder.to_polygon());
        }
    }

    fn end(&mut self) {
        self.clear_sketch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Point;

    fn press(tool: &mut PolygonSketchTool, x: f64, y: f64) -> Option<Polygon> {
        let event = PointerEvent::new(Point::new(x, y), PointerButton::Primary);
        let constructed = tool.pointer_down(event);
        tool.pointer_up(event);
        constructed
    }

    fn finish(tool: &mut PolygonSketchTool) -> Option<Polygon> {
        tool.pointer_down(PointerEvent::new(
            Point::new(0.0, 0.0),
            PointerButton::Secondary,
        ))
    }

    #[test]
    fn test_three_vertices_construct_a_polygon() {
        let mut tool = PolygonSketchTool::new(SpatialReference::web_mercator());
        tool.begin();

        assert!(press(&mut tool, 0.0, 0.0).is_none());
        assert!(press(&mut tool, 4.0, 0.0).is_none());
        assert!(press(&mut tool, 0.0, 4.0).is_none());

        let polygon = finish(&mut tool).expect("polygon should be constructed");
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.vertices()[1], Point::new(4.0, 0.0));

        // The sketch was cleared with the construction.
        assert_eq!(tool.vertex_count(), 0);
        assert!(tool.preview().is_none());
    }

    #[test]
    fn test_too_few_vertices_discard_the_sketch() {
        let mut tool = PolygonSketchTool::new(SpatialReference::web_mercator());
        tool.begin();

        press(&mut tool, 0.0, 0.0);
        press(&mut tool, 1.0, 1.0);

        assert!(finish(&mut tool).is_none());
        assert_eq!(tool.vertex_count(), 0);
    }

    #[test]
    fn test_preview_appears_after_third_vertex() {
        let mut tool = PolygonSketchTool::new(SpatialReference::web_mercator());
        tool.begin();

        press(&mut tool, 0.0, 0.0);
        press(&mut tool, 1.0, 0.0);
        assert!(tool.preview().is_none());

        press(&mut tool, 1.0, 1.0);
        assert_eq!(tool.preview().map(Polygon::vertex_count), Some(3));
    }

    #[test]
    fn test_end_discards_unfinished_state() {
        let mut tool = PolygonSketchTool::new(SpatialReference::web_mercator());
        tool.begin();

        press(&mut tool, 0.0, 0.0);
        press(&mut tool, 1.0, 0.0);
        press(&mut tool, 1.0, 1.0);
        tool.end();

        assert_eq!(tool.vertex_count(), 0);
        assert!(tool.preview().is_none());
    }
}
