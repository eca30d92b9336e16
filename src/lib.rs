//! # QRganize
//!
//! Catalog and metadata service for a comic-management application. Stores
//! comics, their pages, translation overlay boxes, tags, creators, and
//! source attributions in SQLite, and exposes CRUD plus many-to-many
//! linking over a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌──────────┐
//! │   HTTP   │──▶│  Unit of Work   │──▶│  SQLite   │
//! │ handlers │   │ + repositories │   │ (14 tbls) │
//! └──────────┘   └────────────────┘   └──────────┘
//! ```
//!
//! Each request acquires one unit of work from the factory, issues
//! repository calls against it, and saves once; all staged writes commit
//! together or not at all.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Entity record types |
//! | [`store`] | Generic repository + unit-of-work data access |
//! | [`api`] | HTTP route handlers |
//! | [`server`] | Router, error contract, startup |
//! | [`db`] | Database connection options |
//! | [`migrate`] | Schema migrations |

pub mod api;
pub mod config;
pub mod db;
pub mod migrate;
pub mod models;
pub mod server;
pub mod store;
