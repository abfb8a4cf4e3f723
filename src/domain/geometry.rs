//! Planar geometry primitives.
//!
//! Geometries carry the spatial reference they were constructed in; the
//! engine never reprojects — input and output features share the reference
//! of the view they were sketched or extracted from.

use serde::{Deserialize, Serialize};

/// Well-known identifier of a spatial reference system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    wkid: i32,
}

impl SpatialReference {
    pub fn new(wkid: i32) -> Self {
        Self { wkid }
    }

    /// WGS84 geographic coordinates (EPSG:4326).
    pub fn wgs84() -> Self {
        Self { wkid: 4326 }
    }

    /// Web Mercator projected coordinates (EPSG:3857).
    pub fn web_mercator() -> Self {
        Self { wkid: 3857 }
    }

    pub fn wkid(&self) -> i32 {
        self.wkid
    }
}

/// A 2D coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding rectangle, e.g. the currently visible map extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    spatial_reference: SpatialReference,
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Envelope {
    pub fn new(
        spatial_reference: SpatialReference,
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    ) -> Self {
        Self {
            spatial_reference,
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Converts the envelope into a polygon ring running lower-left,
    /// upper-left, upper-right, lower-right.
    pub fn as_polygon(&self) -> Polygon {
        let mut builder = PolygonBuilder::new(self.spatial_reference);
        builder.add_point(self.x_min, self.y_min);
        builder.add_point(self.x_min, self.y_max);
        builder.add_point(self.x_max, self.y_max);
        builder.add_point(self.x_max, self.y_min);
        builder.to_polygon()
    }
}

/// A polygon as a single, implicitly closed ring of vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    spatial_reference: SpatialReference,
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(spatial_reference: SpatialReference, vertices: Vec<Point>) -> Self {
        Self {
            spatial_reference,
            vertices,
        }
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Incremental polygon construction, one vertex at a time.
#[derive(Clone, Debug)]
pub struct PolygonBuilder {
    spatial_reference: SpatialReference,
    vertices: Vec<Point>,
}

impl PolygonBuilder {
    pub fn new(spatial_reference: SpatialReference) -> Self {
        Self {
            spatial_reference,
            vertices: Vec::new(),
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.vertices.push(Point::new(x, y));
    }

    pub fn add_vertex(&mut self, vertex: Point) {
        self.vertices.push(vertex);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Discards all captured vertices.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.spatial_reference, self.vertices.clone())
    }
}
