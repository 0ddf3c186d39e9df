// Field record definitions
//
// This module contains the shapes exchanged with the persistence layer and
// the map front end. Wire geometry is GeoJSON (lng, lat); everything inside
// the engine is (lat, lng). The swap happens only in `lng_lat_to_point` and
// `point_to_lng_lat`.

use crate::engine::boundary::{validate_boundary, Boundary};
use crate::engine::geometry::Ring;
use crate::engine::slot::{
    compute_slot, deserialize_date, deserialize_opt_date, validate_slot, Slot,
};
use crate::engine::types::Point;
use crate::error::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const POLYGON_TYPE: &str = "Polygon";

/// GeoJSON position `[lng, lat]` to an engine point
pub fn lng_lat_to_point(position: [f64; 2]) -> Point {
    Point {
        lat: position[1],
        lng: position[0],
    }
}

/// Engine point to a GeoJSON position `[lng, lat]`
pub fn point_to_lng_lat(point: Point) -> [f64; 2] {
    [point.lng, point.lat]
}

/// Polygon geometry as stored with a field
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonGeometry {
    /// Egress: always writes a closed ring, as GeoJSON requires.
    pub fn from_ring(ring: &Ring) -> Self {
        let positions = ring
            .closed()
            .points()
            .iter()
            .copied()
            .map(point_to_lng_lat)
            .collect();
        Self {
            kind: POLYGON_TYPE.to_string(),
            coordinates: vec![positions],
        }
    }

    /// Ingress: the outer ring in (lat, lng) order, closing point kept as stored.
    pub fn to_ring(&self) -> Result<Ring, EngineError> {
        if self.kind != POLYGON_TYPE {
            return Err(EngineError::InvalidGeometry(format!(
                "expected a {} geometry, got {:?}",
                POLYGON_TYPE, self.kind
            )));
        }
        match self.coordinates.as_slice() {
            [outer] => Ok(outer.iter().copied().map(lng_lat_to_point).collect()),
            [] => Err(EngineError::InvalidGeometry(
                "polygon has no rings".to_string(),
            )),
            _ => Err(EngineError::InvalidGeometry(
                "polygons with holes are not supported".to_string(),
            )),
        }
    }

    pub fn to_boundary(&self) -> Result<Boundary, EngineError> {
        validate_boundary(self.to_ring()?)
    }
}

impl From<&Boundary> for PolygonGeometry {
    fn from(boundary: &Boundary) -> Self {
        PolygonGeometry::from_ring(boundary.ring())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Sugarcane,
    Wheat,
    Rice,
    Maize,
    Cotton,
}

impl CropKind {
    pub const ALL: [CropKind; 5] = [
        CropKind::Sugarcane,
        CropKind::Wheat,
        CropKind::Rice,
        CropKind::Maize,
        CropKind::Cotton,
    ];

    /// Display name, e.g. "Sugarcane"
    pub fn label(&self) -> &'static str {
        match self {
            CropKind::Sugarcane => "Sugarcane",
            CropKind::Wheat => "Wheat",
            CropKind::Rice => "Rice",
            CropKind::Maize => "Maize",
            CropKind::Cotton => "Cotton",
        }
    }
}

/// A monitored field as persisted by the backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldRecord {
    pub name: String,
    pub crop: CropKind,
    pub boundary: PolygonGeometry,
    #[serde(deserialize_with = "deserialize_date")]
    pub from: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub to: NaiveDate,
}

impl FieldRecord {
    pub fn slot(&self) -> Result<Slot, EngineError> {
        validate_slot(Some(self.from), Some(self.to))
    }

    /// Applies an edit. The boundary is immutable after creation; the record
    /// is left untouched when the edit is rejected.
    pub fn apply_edit(&mut self, edit: &FieldEdit) -> Result<(), EngineError> {
        let name = edit.name.trim();
        if name.is_empty() {
            return Err(EngineError::MissingField("name"));
        }
        let slot = compute_slot(edit.from)?;

        self.name = name.to_string();
        self.crop = edit.crop;
        self.from = slot.from;
        self.to = slot.to;
        Ok(())
    }
}

/// Form state of the field creation flow
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FieldDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub crop: Option<CropKind>,
    #[serde(default)]
    pub boundary: Option<PolygonGeometry>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub to: Option<NaiveDate>,
}

impl FieldDraft {
    /// Checks boundary, name, crop and slot in that order and builds the record.
    pub fn confirm(self) -> Result<FieldRecord, EngineError> {
        let boundary = self.boundary.ok_or(EngineError::MissingField("boundary"))?;
        boundary.to_boundary()?;

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(EngineError::MissingField("name"))?
            .to_string();
        let crop = self.crop.ok_or(EngineError::MissingField("crop"))?;
        let slot = validate_slot(self.from, self.to)?;

        Ok(FieldRecord {
            name,
            crop,
            boundary,
            from: slot.from,
            to: slot.to,
        })
    }
}

/// Editable part of a field: name, crop and the window anchor
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FieldEdit {
    pub name: String,
    pub crop: CropKind,
    #[serde(deserialize_with = "deserialize_date")]
    pub from: NaiveDate,
}

/// Reference to a field inside a prediction, either an id or an embedded record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldRef {
    Id(String),
    Embedded {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl FieldRef {
    pub fn id(&self) -> &str {
        match self {
            FieldRef::Id(id) => id,
            FieldRef::Embedded { id } => id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    #[serde(default)]
    pub ndvi: Option<f64>,
    #[serde(default)]
    pub ndvi_series: Vec<f64>,
    #[serde(default)]
    pub evi: Option<f64>,
    #[serde(default)]
    pub savi: Option<f64>,
    #[serde(default)]
    pub gndvi: Option<f64>,
    #[serde(default, rename = "yield")]
    pub yield_estimate: Option<f64>,
}

/// A model run for one field, produced by the external prediction service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub field: FieldRef,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub result: PredictionResult,
}

/// Newest prediction for the field; on equal timestamps the later entry wins.
pub fn latest_prediction<'a>(
    records: &'a [PredictionRecord],
    field_id: &str,
) -> Option<&'a PredictionRecord> {
    records
        .iter()
        .filter(|r| r.field.id() == field_id)
        .max_by_key(|r| r.created_at)
}
