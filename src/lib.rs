//! # jewelry-tryon-api
//!
//! Catalog and engagement-analytics REST backend for a jewelry virtual
//! try-on storefront.
//!
//! The service stores jewelry items with their pricing, images, AR
//! overlay parameters, and per-item counters, records interaction
//! events from try-on sessions, and reports per-item and catalog-wide
//! statistics.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── CatalogService, AnalyticsService (service/)
//!     │
//!     ├── Store trait (persistence/)
//!     │     ├── PostgresStore (JSONB documents)
//!     │     └── MemoryStore
//!     │
//!     └── Domain models (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
