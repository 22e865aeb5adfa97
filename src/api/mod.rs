//! HTTP API: public tracking endpoints, the admin scope and health checks

pub mod constants;
pub mod context;
pub mod middleware;
pub mod services;

pub use context::AppContext;
