// Domain module - Configuration, errors and output model
pub mod config;
pub mod error;
pub mod model;
