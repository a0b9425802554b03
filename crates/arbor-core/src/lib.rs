//! Arbor Core
//!
//! This crate contains the ambient functionality shared by the Arbor crates:
//! collection aliases, logging setup, profiling scopes and runtime configuration.

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;

pub use config::{Config, Platform};
