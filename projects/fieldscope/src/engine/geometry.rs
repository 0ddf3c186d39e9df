use crate::engine::types::{BoundingBox, Point};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// Keeps the crossing longitude finite when an edge is horizontal.
const RAY_EPSILON: f64 = 1e-12;

/// Ordered polygon outline in (lat, lng) order.
///
/// A ring is conceptually closed; the closing point may or may not be stored
/// explicitly. Self-intersection is assumed absent but never checked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Ring(Vec<Point>);

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the closing point is stored explicitly (first == last).
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }

    /// The vertices without the explicit closing duplicate.
    pub fn open_vertices(&self) -> &[Point] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    /// Returns the ring with its closing point stored explicitly.
    pub fn closed(&self) -> Ring {
        let mut points = self.0.clone();
        if !self.is_closed() {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }
        Ring(points)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scans every stored point of the ring for its lat/lng extent.
pub fn bounding_box(ring: &Ring) -> Result<BoundingBox, EngineError> {
    if ring.len() < 3 {
        return Err(EngineError::InvalidGeometry(format!(
            "ring has {} points, at least 3 are required",
            ring.len()
        )));
    }

    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lng = f64::MAX;
    let mut max_lng = f64::MIN;

    for p in ring.points() {
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
        min_lng = min_lng.min(p.lng);
        max_lng = max_lng.max(p.lng);
    }

    Ok(BoundingBox {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    })
}

/// Ray-casting containment test, ray cast toward +inf longitude.
///
/// Points exactly on an edge follow a half-open convention: an edge only
/// counts when the test latitude lies in `[min_lat, max_lat)` of that edge,
/// and a crossing needs the point strictly west of it. On an axis-aligned
/// rectangle, the southern and western edges are therefore inside and the
/// northern and eastern edges outside. Sloped edges can flip either way by
/// float rounding; that ambiguity is accepted.
pub fn point_in_polygon(point: Point, ring: &Ring) -> bool {
    let vs = ring.points();
    if vs.is_empty() {
        return false;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = vs.len() - 1;
    for i in 0..vs.len() {
        let (xi, yi) = (vs[i].lng, vs[i].lat);
        let (xj, yj) = (vs[j].lng, vs[j].lat);
        let spans = (yi > y) != (yj > y);
        if spans && x < (xj - xi) * (y - yi) / (yj - yi + RAY_EPSILON) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Great-circle distance in meters (haversine formula).
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(p2.lat - p1.lat);
    let dlng = to_rad(p2.lng - p1.lng);
    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(p1.lat).cos() * to_rad(p2.lat).cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
        ])
    }

    #[test]
    fn test_point_in_square() {
        let ring = square();
        assert!(point_in_polygon(Point::new(1.0, 1.0), &ring));
        assert!(!point_in_polygon(Point::new(3.0, 3.0), &ring));
        assert!(!point_in_polygon(Point::new(-0.5, 1.0), &ring));
        assert!(!point_in_polygon(Point::new(1.0, 2.5), &ring));
    }

    #[test]
    fn test_point_on_edge_is_half_open() {
        let ring = square();
        // South and west edges count as inside
        assert!(point_in_polygon(Point::new(0.0, 1.0), &ring));
        assert!(point_in_polygon(Point::new(1.0, 0.0), &ring));
        assert!(point_in_polygon(Point::new(0.0, 0.0), &ring));
        // North and east edges count as outside
        assert!(!point_in_polygon(Point::new(2.0, 1.0), &ring));
        assert!(!point_in_polygon(Point::new(1.0, 2.0), &ring));
        assert!(!point_in_polygon(Point::new(2.0, 2.0), &ring));
    }

    #[test]
    fn test_point_in_polygon_ignores_explicit_closure() {
        let open = square();
        let closed = open.closed();
        for p in [
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 3.0),
        ] {
            assert_eq!(point_in_polygon(p, &open), point_in_polygon(p, &closed));
        }
    }

    #[test]
    fn test_point_in_concave_ring() {
        // U shape opening to the north
        let ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 2.0),
            Point::new(1.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 0.0),
        ]);
        assert!(point_in_polygon(Point::new(2.0, 0.5), &ring));
        assert!(point_in_polygon(Point::new(2.0, 2.5), &ring));
        assert!(!point_in_polygon(Point::new(2.0, 1.5), &ring));
    }

    #[test]
    fn test_point_in_empty_ring() {
        assert!(!point_in_polygon(Point::new(0.0, 0.0), &Ring::default()));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = bounding_box(&square()).unwrap();
        assert_eq!(bbox.min_lat, 0.0);
        assert_eq!(bbox.max_lat, 2.0);
        assert_eq!(bbox.min_lng, 0.0);
        assert_eq!(bbox.max_lng, 2.0);
    }

    #[test]
    fn test_bounding_box_requires_three_points() {
        let ring = Ring::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(matches!(
            bounding_box(&ring),
            Err(EngineError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_ring_closure() {
        let ring = square();
        assert!(!ring.is_closed());
        assert_eq!(ring.open_vertices().len(), 4);

        let closed = ring.closed();
        assert!(closed.is_closed());
        assert_eq!(closed.len(), 5);
        assert_eq!(closed.open_vertices(), ring.points());
        // Closing an already closed ring is a no-op
        assert_eq!(closed.closed(), closed);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_distance(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_haversine_is_symmetric_and_zero_on_same_point() {
        let a = Point::new(31.5501, 74.3436);
        let b = Point::new(31.5480, 74.3400);
        assert_eq!(haversine_distance(a, a), 0.0);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
    }
}
