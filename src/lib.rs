pub mod config;
pub mod error;
pub mod registry;
pub mod rng;
pub mod series;
pub mod server;
