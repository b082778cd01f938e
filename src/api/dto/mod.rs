//! Data Transfer Objects for REST request/response serialization.
//!
//! Every successful response body carries `"success": true`; failures
//! use [`crate::error::ErrorResponse`].

pub mod analytics_dto;
pub mod common_dto;
pub mod jewelry_dto;

pub use analytics_dto::*;
pub use common_dto::*;
pub use jewelry_dto::*;
