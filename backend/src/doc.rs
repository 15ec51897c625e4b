//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, trips,
//!   items, health)
//! - **Schemas**: Request and response DTOs plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::accounts::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::trips::{
    CreateTripRequest, ItemPatchRequest, ItemRequest, ItemResponse, MessageResponse,
    TripResponse, UpdateTripRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PackWise API",
        description = "Accounts, trips and packing lists for the PackWise travel planner."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::trips::add_item,
        crate::inbound::http::trips::update_item,
        crate::inbound::http::trips::remove_item,
        crate::inbound::http::trips::toggle_packed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::welcome::welcome,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        AuthResponse,
        CreateTripRequest,
        UpdateTripRequest,
        ItemRequest,
        ItemPatchRequest,
        ItemResponse,
        TripResponse,
        MessageResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "trips", description = "Trips owned by the authenticated user"),
        (name = "items", description = "Packing list items within a trip"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
