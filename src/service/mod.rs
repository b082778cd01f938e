//! Service layer: business operations over the shared [`crate::persistence::Store`].
//!
//! Both services are stateless apart from the injected store handle and
//! can be cloned freely. Validation happens here, before any write.

pub mod analytics_service;
pub mod catalog_service;

pub use analytics_service::{AnalyticsService, ItemReport, OverallReport};
pub use catalog_service::{CatalogService, ItemPage, ListQuery};
