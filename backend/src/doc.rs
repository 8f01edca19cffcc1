//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification for
//! the REST API. It registers:
//!
//! - **Paths**: health probes from the api layer
//! - **Schemas**: request/response transfer types from the inbound layer and
//!   domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that provide
//!   OpenAPI definitions without coupling domain types to the utoipa framework

use utoipa::OpenApi;

use crate::inbound::http::dtos::{
    BookingResponse, CreateMessageRequest, CreateReviewRequest, DisputeOutcome,
    ResolveDisputeRequest, SuspendUserRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inspection marketplace backend API",
        description = "HTTP interface for the vehicle pre-purchase inspection \
                       marketplace: bookings, reviews, disputes, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        BookingResponse,
        CreateMessageRequest,
        CreateReviewRequest,
        DisputeOutcome,
        ResolveDisputeRequest,
        SuspendUserRequest,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_registers_health_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health/ready"));
        assert!(doc.paths.paths.contains_key("/health/live"));
    }

    #[test]
    fn openapi_registers_transfer_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        for name in [
            "CreateReviewRequest",
            "SuspendUserRequest",
            "ResolveDisputeRequest",
            "CreateMessageRequest",
            "BookingResponse",
        ] {
            assert!(schemas.contains_key(name), "missing schema '{name}'");
        }
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.Error"));
    }
}
