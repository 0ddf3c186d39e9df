use crate::engine::geometry::{bounding_box, point_in_polygon, Ring};
use crate::engine::types::{BoundingBox, Point};
use crate::error::EngineError;
use geo::ChamberlainDuquetteArea;
use geo_types::{LineString, Polygon};
use serde::Serialize;

/// A validated field outline: one outer ring, no holes.
///
/// Only `validate_boundary` builds one, so every `Boundary` has at least three
/// distinct finite vertices, no zero-length edge and a bounding box with area.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Boundary {
    ring: Ring,
    bbox: BoundingBox,
}

impl Boundary {
    /// The ring exactly as drawn
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Number of vertices, not counting an explicit closing point.
    pub fn vertex_count(&self) -> usize {
        self.ring.open_vertices().len()
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.ring)
    }

    /// Convert to a geo_types Polygon (x = lng, y = lat)
    pub fn to_polygon(&self) -> Polygon<f64> {
        let coords: Vec<(f64, f64)> = self
            .ring
            .closed()
            .points()
            .iter()
            .map(|p| (p.lng, p.lat))
            .collect();
        Polygon::new(LineString::from(coords), vec![])
    }

    /// Approximate enclosed area in square meters on a spherical Earth.
    pub fn area_m2(&self) -> f64 {
        self.to_polygon().chamberlain_duquette_unsigned_area()
    }

    pub fn into_ring(self) -> Ring {
        self.ring
    }
}

/// Validates a drawn ring and wraps it, order preserved, into a `Boundary`.
///
/// An explicit closing duplicate is allowed and not counted as a vertex.
pub fn validate_boundary(ring: Ring) -> Result<Boundary, EngineError> {
    if ring.len() < 3 {
        return Err(EngineError::InvalidGeometry(format!(
            "ring has {} points, at least 3 are required",
            ring.len()
        )));
    }

    if let Some(idx) = ring.points().iter().position(|p| !p.is_finite()) {
        return Err(EngineError::InvalidGeometry(format!(
            "vertex {} has a non-finite coordinate",
            idx
        )));
    }

    if let Some(idx) = ring.points().windows(2).position(|w| w[0] == w[1]) {
        return Err(EngineError::InvalidGeometry(format!(
            "zero-length edge between vertices {} and {}",
            idx,
            idx + 1
        )));
    }

    let distinct = count_distinct(ring.open_vertices());
    if distinct < 3 {
        return Err(EngineError::InvalidGeometry(format!(
            "ring has {} distinct vertices, at least 3 are required",
            distinct
        )));
    }

    let bbox = bounding_box(&ring)?;
    if bbox.is_degenerate() {
        return Err(EngineError::InvalidGeometry(
            "bounding box has no area, the ring is collinear along an axis".to_string(),
        ));
    }

    Ok(Boundary { ring, bbox })
}

fn count_distinct(points: &[Point]) -> usize {
    let mut seen: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen.len()
}

/// Holds the single boundary candidate of a field creation or edit form.
///
/// Submitting a new ring discards the previous candidate first, so a rejected
/// draw leaves the session empty.
#[derive(Debug, Default)]
pub struct CaptureSession {
    candidate: Option<Boundary>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, ring: Ring) -> Result<&Boundary, EngineError> {
        self.candidate = None;
        let boundary = validate_boundary(ring)?;
        tracing::debug!(
            "Boundary candidate replaced ({} vertices)",
            boundary.vertex_count()
        );
        Ok(self.candidate.insert(boundary))
    }

    pub fn candidate(&self) -> Option<&Boundary> {
        self.candidate.as_ref()
    }

    /// Takes the candidate out of the session.
    pub fn confirm(&mut self) -> Option<Boundary> {
        self.candidate.take()
    }

    pub fn clear(&mut self) {
        self.candidate = None;
    }
}
