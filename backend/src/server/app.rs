//! Actix application assembly shared by the server and integration tests.

use actix_cors::Cors;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::{App, web};

use packwise::Trace;
#[cfg(debug_assertions)]
use packwise::doc::ApiDoc;
use packwise::inbound::http::accounts::{login, register};
use packwise::inbound::http::error::json_error_handler;
use packwise::inbound::http::health::{HealthState, live, ready};
use packwise::inbound::http::state::HttpState;
use packwise::inbound::http::trips;
use packwise::inbound::http::welcome::welcome;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub cors_origins: Vec<String>,
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}

pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_origins,
    } = deps;

    let auth = web::scope("/api/auth").service(register).service(login);
    let trips = web::scope("/api/trips").configure(trips::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .wrap(cors(&cors_origins))
        .service(auth)
        .service(trips)
        .service(ready)
        .service(live)
        .service(welcome);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}
