// src/config/mod.rs
pub mod engine;

pub use engine::{load_engine_config_default, load_engine_config_from, EngineConfig};
