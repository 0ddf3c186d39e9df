use axum::{extract::State, http::StatusCode, Json};
use fieldscope::engine::grid::{rasterize_with, GridCell, GridConfig, GridSummary};
use fieldscope::engine::measure::Measurement;
use fieldscope::engine::slot::{deserialize_opt_date, validate_slot, Slot};
use fieldscope::engine::types::{BoundingBox, HealthBand};
use fieldscope::error::EngineError;
use fieldscope::records::{lng_lat_to_point, FieldDraft, FieldRecord, PolygonGeometry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(err: EngineError) -> (StatusCode, String) {
    tracing::debug!("Rejected request: {}", err);
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

#[derive(Serialize)]
pub struct BandInfo {
    pub band: HealthBand,
    pub color: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Serialize)]
pub struct BoundaryInfo {
    pub vertex_count: usize,
    pub bbox: BoundingBox,
    pub area_m2: f64,
}

#[derive(Deserialize)]
pub struct GridRequest {
    pub boundary: PolygonGeometry,
    #[serde(default)]
    pub series: Vec<f64>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
}

#[derive(Serialize)]
pub struct GridResponse {
    pub summary: GridSummary,
    pub cells: Vec<GridCell>,
}

/// Path in GeoJSON order, `[lng, lat]` per position
#[derive(Deserialize)]
pub struct MeasureRequest {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Serialize)]
pub struct MeasureResponse {
    pub meters: f64,
    pub label: String,
}

#[derive(Deserialize)]
pub struct SlotRequest {
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub from: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub to: Option<chrono::NaiveDate>,
}

pub async fn bands_handler() -> Json<Vec<BandInfo>> {
    let bands = HealthBand::ALL
        .iter()
        .map(|band| {
            let (min, max) = band.range();
            BandInfo {
                band: *band,
                color: band.swatch(),
                min,
                max,
            }
        })
        .collect();
    Json(bands)
}

pub async fn validate_boundary_handler(
    Json(geometry): Json<PolygonGeometry>,
) -> ApiResult<BoundaryInfo> {
    let boundary = geometry.to_boundary().map_err(reject)?;
    Ok(Json(BoundaryInfo {
        vertex_count: boundary.vertex_count(),
        bbox: boundary.bbox(),
        area_m2: boundary.area_m2(),
    }))
}

pub async fn grid_handler(
    State(defaults): State<Arc<GridConfig>>,
    Json(payload): Json<GridRequest>,
) -> ApiResult<GridResponse> {
    let boundary = payload.boundary.to_boundary().map_err(reject)?;
    let config = GridConfig {
        rows: payload.rows.unwrap_or(defaults.rows),
        cols: payload.cols.unwrap_or(defaults.cols),
        fallback_index: defaults.fallback_index,
    };
    let cells = rasterize_with(&boundary, &payload.series, &config).map_err(reject)?;
    let summary = GridSummary::from_cells(&config, &cells);
    Ok(Json(GridResponse { summary, cells }))
}

pub async fn measure_handler(Json(payload): Json<MeasureRequest>) -> ApiResult<MeasureResponse> {
    let points = payload
        .coordinates
        .into_iter()
        .map(lng_lat_to_point)
        .collect();
    let measurement = Measurement::checked(points).map_err(reject)?;
    Ok(Json(MeasureResponse {
        meters: measurement.total_meters(),
        label: measurement.label(),
    }))
}

pub async fn slot_handler(Json(payload): Json<SlotRequest>) -> ApiResult<Slot> {
    validate_slot(payload.from, payload.to)
        .map(Json)
        .map_err(reject)
}

pub async fn confirm_field_handler(Json(draft): Json<FieldDraft>) -> ApiResult<FieldRecord> {
    let record = draft.confirm().map_err(reject)?;
    tracing::info!("Confirmed field {:?} ({})", record.name, record.crop.label());
    Ok(Json(record))
}
