//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::handlers::{analytics, jewelry, system};
use crate::error::ErrorResponse;

/// Collected OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Jewelry AR Try-On API",
        description = "Catalog and engagement analytics for a jewelry virtual try-on storefront."
    ),
    paths(
        jewelry::create_jewelry,
        jewelry::list_jewelry,
        jewelry::get_jewelry,
        jewelry::update_jewelry,
        jewelry::delete_jewelry,
        analytics::track_event,
        analytics::item_analytics,
        analytics::overall_analytics,
        system::root_handler,
        system::health_handler,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "Jewelry", description = "Catalog management"),
        (name = "Analytics", description = "Engagement tracking and reports"),
        (name = "System", description = "Service metadata and health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/docs` serving the document at `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
