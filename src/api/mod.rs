//! HTTP route handlers, one module per resource.
//!
//! Handlers translate requests into unit-of-work calls and results into
//! JSON payloads. Writes follow a fixed shape: acquire a unit of work,
//! stage repository calls, `save_changes` once, drop the unit of work.
//! Partial-update semantics (only overwrite supplied fields) live here,
//! never in the store layer.

pub mod comics;
pub mod creators;
pub mod health;
pub mod overlays;
pub mod pages;
pub mod sources;
pub mod tags;
