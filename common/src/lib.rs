// Shared modules for the Fuel protocol tooling
pub mod config;
pub mod execution_layer;
pub mod shared;
pub mod utils;
