use crate::engine::geometry::haversine_distance;
use crate::engine::types::Point;
use crate::error::EngineError;
use serde::Serialize;

/// Cumulative great-circle length of a drawn path in meters; 0 for fewer than 2 points.
pub fn measure(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

/// Distance label as shown after a measurement, e.g. "1.25 km"
pub fn format_kilometers(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// A polyline captured in measurement mode with its running length.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    points: Vec<Point>,
    total_meters: f64,
}

impl Measurement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        let total_meters = measure(&points);
        Self {
            points,
            total_meters,
        }
    }

    /// Like `from_points`, but rejects any non-finite coordinate.
    pub fn checked(points: Vec<Point>) -> Result<Self, EngineError> {
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(EngineError::InvalidGeometry(format!(
                "non-finite coordinate ({}, {})",
                bad.lat, bad.lng
            )));
        }
        Ok(Self::from_points(points))
    }

    /// Appends a point and returns the length of the new segment.
    pub fn push(&mut self, point: Point) -> f64 {
        let segment = self
            .points
            .last()
            .map(|last| haversine_distance(*last, point))
            .unwrap_or(0.0);
        self.points.push(point);
        self.total_meters += segment;
        segment
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn total_meters(&self) -> f64 {
        self.total_meters
    }

    pub fn label(&self) -> String {
        format_kilometers(self.total_meters)
    }
}
