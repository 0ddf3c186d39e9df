// Field boundary and vegetation-index grid engine

pub mod boundary;
pub mod geometry;
pub mod grid;
pub mod measure;
pub mod session;
pub mod slot;
pub mod types;
