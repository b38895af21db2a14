//! WatchLater library
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;
pub mod engine;
pub mod fixture;
pub mod render;

pub use config::Config;
pub use engine::Engine;
pub use fixture::{SessionSpec, SimulatedBrowser, TabBehaviour, TabSpec};
