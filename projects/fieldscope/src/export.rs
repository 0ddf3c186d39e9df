use crate::engine::grid::GridCell;
use crate::engine::types::HealthBand;
use serde::Serialize;
use std::io::Write;

/// Flat CSV row for one rasterized cell
#[derive(Serialize)]
struct CellRow {
    row: usize,
    col: usize,
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    center_lat: f64,
    center_lng: f64,
    value: f64,
    band: HealthBand,
}

impl From<&GridCell> for CellRow {
    fn from(cell: &GridCell) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            south: cell.bounds.min_lat,
            west: cell.bounds.min_lng,
            north: cell.bounds.max_lat,
            east: cell.bounds.max_lng,
            center_lat: cell.center.lat,
            center_lng: cell.center.lng,
            value: cell.value,
            band: cell.band,
        }
    }
}

/// Writes the cells as CSV with a header row
pub fn write_cells_csv<W: Write>(writer: W, cells: &[GridCell]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for cell in cells {
        wtr.serialize(CellRow::from(cell))?;
    }
    wtr.flush()?;
    Ok(())
}
