//! tourstats - visitor and page-view analytics for a tourism office
//!
//! This library records anonymous visitor profiles, per-page view counts
//! and a site-wide view counter in a single SQLite file, and exposes them
//! over an HTTP API and a maintenance CLI.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line maintenance commands (default)
//!
//! # Architecture
//! - `storage`: Value domains, models and the SeaORM SQLite backend
//! - `backup`: File-level backups of the data file
//! - `api`: HTTP services and middleware
//! - `services`: Sample data generation
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod backup;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
