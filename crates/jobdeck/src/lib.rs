//! jobdeck: board service for tracking job applications through an
//! automation pipeline.
//!
//! The `board` module is the core: the status registry, the fixed column
//! taxonomy, the pure distribution engine, and the controller/service pair
//! that reconciles optimistic board moves with the remote automation
//! backend. `config`, `telemetry`, and `error` carry the service plumbing.

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;
