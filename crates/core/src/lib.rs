//! Domain logic for the balloon atlas.
//!
//! Everything here is pure: no I/O, no async. The API server and the client
//! layer both build on these functions so each hop applies the same parsing
//! and repair rules independently.

pub mod choropleth;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod reconcile;
pub mod scale;
pub mod telemetry;
