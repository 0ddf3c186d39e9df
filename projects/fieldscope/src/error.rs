use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Errors raised by the field engine. None of them are retried internally.
pub enum EngineError {
    /// The ring is too short, has a zero-length edge, a non-finite coordinate,
    /// or spans no area on one of its axes.
    #[error("invalid geometry - {0}")]
    InvalidGeometry(String),
    /// The monitoring window is missing its anchor date or is not exactly 14 days long.
    #[error("invalid date range - {0}")]
    InvalidDateRange(String),
    /// A grid needs at least one row and one column, and no more than
    /// `MAX_GRID_CELLS` cells in total.
    #[error(
        "invalid grid size {rows}x{cols} - rows and columns must be at least 1 and cover at most {} cells",
        crate::engine::grid::MAX_GRID_CELLS
    )]
    InvalidGridSize { rows: usize, cols: usize },
    /// A field draft is missing a required value.
    #[error("incomplete field - {0}")]
    MissingField(&'static str),
}
