pub mod config;
pub mod layer;
