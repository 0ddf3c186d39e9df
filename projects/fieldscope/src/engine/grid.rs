use crate::engine::boundary::Boundary;
use crate::engine::types::{BoundingBox, HealthBand, Point};
use crate::error::EngineError;
use serde::Serialize;

pub const DEFAULT_GRID_ROWS: usize = 15;
pub const DEFAULT_GRID_COLS: usize = 15;

/// Index value given to inside cells when the series is empty.
pub const DEFAULT_FALLBACK_INDEX: f64 = 0.0;

/// Upper bound on `rows * cols` for a single grid.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Grid resolution and empty-series policy
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub fallback_index: f64,
}

impl GridConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            fallback_index: DEFAULT_FALLBACK_INDEX,
        }
    }

    pub fn total_cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_ROWS, DEFAULT_GRID_COLS)
    }
}

/// One cell of the full grid with its containment flag
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellSample {
    pub row: usize,
    pub col: usize,
    pub bounds: BoundingBox,
    pub center: Point,
    pub inside: bool,
}

/// A cell kept by the rasterizer, with its index value and health band
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub bounds: BoundingBox,
    pub center: Point,
    pub value: f64,
    pub band: HealthBand,
}

/// Splits the boundary's bounding box into `rows x cols` equal cells, row-major
/// from the south-west corner, and tests every cell center against the ring.
pub fn sample_cells(
    boundary: &Boundary,
    rows: usize,
    cols: usize,
) -> Result<Vec<CellSample>, EngineError> {
    let total = match rows.checked_mul(cols) {
        Some(total) if total > 0 && total <= MAX_GRID_CELLS => total,
        _ => return Err(EngineError::InvalidGridSize { rows, cols }),
    };

    let bbox = boundary.bbox();
    let lat_step = bbox.lat_span() / rows as f64;
    let lng_step = bbox.lng_span() / cols as f64;

    let mut samples = Vec::with_capacity(total);
    for i in 0..rows {
        for j in 0..cols {
            let bounds = BoundingBox {
                min_lat: bbox.min_lat + i as f64 * lat_step,
                max_lat: bbox.min_lat + (i + 1) as f64 * lat_step,
                min_lng: bbox.min_lng + j as f64 * lng_step,
                max_lng: bbox.min_lng + (j + 1) as f64 * lng_step,
            };
            let center = bounds.center();
            samples.push(CellSample {
                row: i,
                col: j,
                bounds,
                center,
                inside: boundary.contains(center),
            });
        }
    }
    Ok(samples)
}

/// Rasterizes the series over the boundary with the default empty-series value.
pub fn rasterize(
    boundary: &Boundary,
    series: &[f64],
    rows: usize,
    cols: usize,
) -> Result<Vec<GridCell>, EngineError> {
    rasterize_with(boundary, series, &GridConfig::new(rows, cols))
}

/// Keeps the cells whose center is inside the boundary. Cell `(i, j)` takes
/// `series[(i * cols + j) % len]`, so short series repeat across the grid.
pub fn rasterize_with(
    boundary: &Boundary,
    series: &[f64],
    config: &GridConfig,
) -> Result<Vec<GridCell>, EngineError> {
    let samples = sample_cells(boundary, config.rows, config.cols)?;

    if series.is_empty() {
        tracing::debug!(
            "Empty index series, inside cells use fallback value {}",
            config.fallback_index
        );
    }

    let cells: Vec<GridCell> = samples
        .into_iter()
        .filter(|s| s.inside)
        .map(|s| {
            let value = series_value(series, s.row * config.cols + s.col, config.fallback_index);
            GridCell {
                row: s.row,
                col: s.col,
                bounds: s.bounds,
                center: s.center,
                value,
                band: HealthBand::from_index(value),
            }
        })
        .collect();

    tracing::debug!(
        "Rasterized {}x{} grid: {} of {} cells inside",
        config.rows,
        config.cols,
        cells.len(),
        config.total_cells()
    );
    Ok(cells)
}

fn series_value(series: &[f64], slot: usize, fallback: f64) -> f64 {
    if series.is_empty() {
        return fallback;
    }
    series[slot % series.len()]
}

/// Number of cells per health band
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub poor: usize,
    pub low: usize,
    pub fair: usize,
    pub excellent: usize,
}

impl BandCounts {
    pub fn add(&mut self, band: HealthBand) {
        match band {
            HealthBand::Poor => self.poor += 1,
            HealthBand::Low => self.low += 1,
            HealthBand::Fair => self.fair += 1,
            HealthBand::Excellent => self.excellent += 1,
        }
    }

    pub fn get(&self, band: HealthBand) -> usize {
        match band {
            HealthBand::Poor => self.poor,
            HealthBand::Low => self.low,
            HealthBand::Fair => self.fair,
            HealthBand::Excellent => self.excellent,
        }
    }

    pub fn total(&self) -> usize {
        self.poor + self.low + self.fair + self.excellent
    }
}

/// Aggregate view of a rasterized grid, for legends and reports
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridSummary {
    pub rows: usize,
    pub cols: usize,
    pub inside_cells: usize,
    pub bands: BandCounts,
    pub mean_value: Option<f64>,
}

impl GridSummary {
    pub fn from_cells(config: &GridConfig, cells: &[GridCell]) -> Self {
        let mut bands = BandCounts::default();
        for cell in cells {
            bands.add(cell.band);
        }
        let mean_value = if cells.is_empty() {
            None
        } else {
            Some(cells.iter().map(|c| c.value).sum::<f64>() / cells.len() as f64)
        };
        Self {
            rows: config.rows,
            cols: config.cols,
            inside_cells: cells.len(),
            bands,
            mean_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::boundary::validate_boundary;
    use crate::engine::geometry::Ring;
    use geo::Contains;

    fn boundary(coords: &[(f64, f64)]) -> Boundary {
        validate_boundary(coords.iter().copied().map(Point::from).collect::<Ring>()).unwrap()
    }

    fn field() -> Boundary {
        // Irregular pentagon around a farm plot
        boundary(&[
            (31.5400, 74.3300),
            (31.5480, 74.3310),
            (31.5520, 74.3420),
            (31.5450, 74.3500),
            (31.5390, 74.3440),
        ])
    }

    #[test]
    fn test_full_square_keeps_every_cell() {
        let square = boundary(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let cells = rasterize(&square, &[0.5], 4, 4).unwrap();
        assert_eq!(cells.len(), 16);
        assert!(cells.iter().all(|c| c.band == HealthBand::Fair));
        assert_eq!(cells[0].center, Point::new(0.25, 0.25));
        assert_eq!(cells[5].row, 1);
        assert_eq!(cells[5].col, 1);
    }

    #[test]
    fn test_triangle_drops_outside_cells() {
        // Right triangle below the diagonal from (0,2) to (2,0)
        let triangle = boundary(&[(0.0, 0.0), (0.0, 2.0), (2.0, 0.0)]);
        let cells = rasterize(&triangle, &[0.8], 2, 2).unwrap();
        // Only the south-west cell center (0.5, 0.5) is strictly inside;
        // (0.5, 1.5) and (1.5, 0.5) sit on the diagonal, (1.5, 1.5) is outside.
        let kept: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.col)).collect();
        assert!(kept.contains(&(0, 0)));
        assert!(!kept.contains(&(1, 1)));
    }

    #[test]
    fn test_series_is_reused_cyclically() {
        let square = boundary(&[(0.0, 0.0), (0.0, 3.0), (3.0, 3.0), (3.0, 0.0)]);
        let series = [0.1, 0.35, 0.5, 0.9];
        let cells = rasterize(&square, &series, 3, 3).unwrap();
        assert_eq!(cells.len(), 9);
        for cell in &cells {
            let expected = series[(cell.row * 3 + cell.col) % series.len()];
            assert_eq!(cell.value, expected);
            assert_eq!(cell.band, HealthBand::from_index(expected));
        }
        assert_eq!(cells[4].value, 0.1);
        assert_eq!(cells[4].band, HealthBand::Poor);
        assert_eq!(cells[1].band, HealthBand::Low);
    }

    #[test]
    fn test_empty_series_uses_fallback() {
        let cells = rasterize(&field(), &[], 15, 15).unwrap();
        assert!(!cells.is_empty());
        assert!(cells.iter().all(|c| c.value == DEFAULT_FALLBACK_INDEX));
        assert!(cells.iter().all(|c| c.band == HealthBand::Poor));

        let config = GridConfig {
            fallback_index: 0.75,
            ..GridConfig::default()
        };
        let cells = rasterize_with(&field(), &[], &config).unwrap();
        assert!(cells.iter().all(|c| c.band == HealthBand::Excellent));
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let series = [0.21, 0.33, 0.47, 0.62, 0.74, 0.88, 0.15];
        let a = rasterize(&field(), &series, 15, 15).unwrap();
        let b = rasterize(&field(), &series, 15, 15).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kept_cells_are_inside_and_match_robust_test() {
        let field = field();
        let polygon = field.to_polygon();
        let samples = sample_cells(&field, 15, 15).unwrap();
        assert_eq!(samples.len(), 225);

        let cells = rasterize(&field, &[0.5], 15, 15).unwrap();
        assert_eq!(cells.len(), samples.iter().filter(|s| s.inside).count());
        for cell in &cells {
            let center = geo_types::Point::new(cell.center.lng, cell.center.lat);
            assert!(polygon.contains(&center), "cell {:?} is outside", cell);
        }
    }

    #[test]
    fn test_single_cell_grid_on_convex_ring() {
        let cells = rasterize(&field(), &[0.4], 1, 1).unwrap();
        assert_eq!(cells.len(), 1);
        let expected = field().bbox().center();
        assert!((cells[0].center.lat - expected.lat).abs() < 1e-9);
        assert!((cells[0].center.lng - expected.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zero_grid_size_fails() {
        assert_eq!(
            rasterize(&field(), &[0.5], 0, 15).unwrap_err(),
            EngineError::InvalidGridSize { rows: 0, cols: 15 }
        );
        assert!(rasterize(&field(), &[0.5], 15, 0).is_err());
    }

    #[test]
    fn test_oversized_grid_fails_cleanly() {
        assert_eq!(
            rasterize(&field(), &[0.5], usize::MAX / 2, 3).unwrap_err(),
            EngineError::InvalidGridSize {
                rows: usize::MAX / 2,
                cols: 3
            }
        );
        assert!(sample_cells(&field(), 100_000, 100_000).is_err());
        assert!(sample_cells(&field(), MAX_GRID_CELLS + 1, 1).is_err());
        assert_eq!(GridConfig::new(usize::MAX, 2).total_cells(), usize::MAX);
    }

    #[test]
    fn test_summary_counts_bands() {
        let square = boundary(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        let config = GridConfig::new(2, 2);
        let cells = rasterize_with(&square, &[0.1, 0.35, 0.5, 0.9], &config).unwrap();
        let summary = GridSummary::from_cells(&config, &cells);
        assert_eq!(summary.inside_cells, 4);
        assert_eq!(summary.bands.poor, 1);
        assert_eq!(summary.bands.low, 1);
        assert_eq!(summary.bands.fair, 1);
        assert_eq!(summary.bands.excellent, 1);
        assert_eq!(summary.bands.total(), 4);
        let mean = summary.mean_value.unwrap();
        assert!((mean - 0.4625).abs() < 1e-12);

        let empty = GridSummary::from_cells(&config, &[]);
        assert_eq!(empty.mean_value, None);
    }
}
