use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees, latitude first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned lat/lng rectangle
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// True when the box has no extent on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.lat_span() <= 0.0 || self.lng_span() <= 0.0
    }

    pub fn center(&self) -> Point {
        Point {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lng: (self.min_lng + self.max_lng) / 2.0,
        }
    }
}

pub const POOR_BELOW: f64 = 0.3;
pub const LOW_BELOW: f64 = 0.4;
pub const FAIR_BELOW: f64 = 0.7;

/// Discrete vegetation health category of an index value.
///
/// Legends and swatches must use exactly these four bands and the
/// `POOR_BELOW` / `LOW_BELOW` / `FAIR_BELOW` breakpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    Poor,
    Low,
    Fair,
    Excellent,
}

impl HealthBand {
    pub const ALL: [HealthBand; 4] = [
        HealthBand::Poor,
        HealthBand::Low,
        HealthBand::Fair,
        HealthBand::Excellent,
    ];

    /// Classifies an index value. Values are not clamped; NaN lands in `Poor`.
    pub fn from_index(value: f64) -> Self {
        if !(value >= POOR_BELOW) {
            HealthBand::Poor
        } else if value < LOW_BELOW {
            HealthBand::Low
        } else if value < FAIR_BELOW {
            HealthBand::Fair
        } else {
            HealthBand::Excellent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthBand::Poor => "poor",
            HealthBand::Low => "low",
            HealthBand::Fair => "fair",
            HealthBand::Excellent => "excellent",
        }
    }

    /// Fill color used by the map overlay and legend.
    pub fn swatch(&self) -> &'static str {
        match self {
            HealthBand::Poor => "red",
            HealthBand::Low => "orange",
            HealthBand::Fair => "yellow",
            HealthBand::Excellent => "green",
        }
    }

    /// Half-open `[lower, upper)` index range of the band; `None` means unbounded.
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        match self {
            HealthBand::Poor => (None, Some(POOR_BELOW)),
            HealthBand::Low => (Some(POOR_BELOW), Some(LOW_BELOW)),
            HealthBand::Fair => (Some(LOW_BELOW), Some(FAIR_BELOW)),
            HealthBand::Excellent => (Some(FAIR_BELOW), None),
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Field-level health status for the latest index reading; `None` means no data.
pub fn field_health(current: Option<f64>) -> Option<HealthBand> {
    current.map(HealthBand::from_index)
}
