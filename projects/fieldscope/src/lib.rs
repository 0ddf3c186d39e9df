//! Field boundary capture, vegetation-index grid rasterization, distance
//! measurement and 14-day monitoring slot arithmetic.
//!
//! Everything under `engine` is synchronous and pure: inputs are passed in,
//! results are returned, nothing is cached or persisted.

pub mod engine;
pub mod error;
pub mod export;
pub mod records;

pub use engine::boundary::{validate_boundary, Boundary, CaptureSession};
pub use engine::geometry::{bounding_box, haversine_distance, point_in_polygon, Ring};
pub use engine::grid::{rasterize, rasterize_with, sample_cells, GridCell, GridConfig};
pub use engine::measure::{measure, Measurement};
pub use engine::slot::{compute_slot, is_valid_slot, validate_slot, Slot};
pub use engine::types::{BoundingBox, HealthBand, Point};
pub use error::EngineError;
