pub mod config;
pub mod generation;
