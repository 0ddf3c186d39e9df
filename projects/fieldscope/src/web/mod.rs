// HTTP surface over the engine

pub mod api;
pub mod server;
