//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod backup;
mod config_gen;
mod data;
mod helpers;

pub use backup::*;
pub use config_gen::*;
pub use data::*;
