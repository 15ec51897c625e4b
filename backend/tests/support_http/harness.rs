//! Server harness and shared world for end-to-end API scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. It runs the production application
//! wiring over in-memory repositories with a controllable clock. The
//! `WorldFixture` ensures the server is stopped even if a test panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{HttpServer, web};
use awc::Client;
use mockable::Clock;
use packwise::domain::TRACE_ID_HEADER;
use packwise::inbound::http::health::HealthState;
use packwise::outbound::security::JwtSecret;
use packwise::test_support::MutableClock;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use crate::ServerConfig;
use crate::app::{AppDependencies, build_app};
use crate::state_builders::build_http_state;

/// Cheapest cost bcrypt accepts; keeps scenarios fast.
const TEST_BCRYPT_COST: u32 = 4;

pub(crate) struct ApiWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) clock: Arc<MutableClock>,
    pub(crate) tokens: HashMap<String, String>,
    pub(crate) user_ids: HashMap<String, String>,
    pub(crate) trips: HashMap<String, String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<ApiWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

async fn spawn_api_server(clock: Arc<dyn Clock>) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let config = ServerConfig::new(addr, JwtSecret::new("scenario-signing-secret"))
        .with_bcrypt_cost(TEST_BCRYPT_COST);
    let http_state = build_http_state(&config, clock).map_err(|err| err.to_string())?;
    let health_state = web::Data::new(HealthState::new());
    let cors_origins = config.cors_origins.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            cors_origins: cors_origins.clone(),
        })
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let clock = Arc::new(MutableClock::at_new_year());
    let server_clock: Arc<dyn Clock> = clock.clone();

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_api_server(server_clock).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(ApiWorld {
        runtime,
        local,
        base_url,
        server,
        clock,
        tokens: HashMap::new(),
        user_ids: HashMap::new(),
        trips: HashMap::new(),
        last_status: None,
        last_body: None,
        last_trace_id: None,
    }));

    WorldFixture { world }
}

/// Strip the quotes Gherkin authors put around step arguments.
pub(crate) fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_owned()
}

/// Token previously issued to `alias`.
pub(crate) fn token_for(world: &SharedWorld, alias: &str) -> String {
    world
        .borrow()
        .tokens
        .get(alias)
        .cloned()
        .unwrap_or_else(|| panic!("no token recorded for {alias}"))
}

/// Trip id previously recorded under `label`.
pub(crate) fn trip_id_for(world: &SharedWorld, label: &str) -> String {
    world
        .borrow()
        .trips
        .get(label)
        .cloned()
        .unwrap_or_else(|| panic!("no trip recorded as {label}"))
}

pub(crate) struct RequestSpec {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) token: Option<String>,
    pub(crate) payload: Option<Value>,
}

/// Send a request and record status, trace id and JSON body in the world.
pub(crate) fn perform(world: &SharedWorld, spec: RequestSpec) {
    let RequestSpec {
        method,
        path,
        token,
        payload,
    } = spec;
    let (status, trace_id, body) = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(token) = token {
            request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.body().await.expect("response body");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, trace_id, json)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_body = Some(body);
}

/// Register `alias` and remember the issued token and user id.
pub(crate) fn register(world: &SharedWorld, alias: &str, email: &str, password: &str) {
    perform(
        world,
        RequestSpec {
            method: Method::POST,
            path: "/api/auth/register".to_owned(),
            token: None,
            payload: Some(serde_json::json!({
                "name": alias,
                "email": email,
                "username": alias,
                "password": password,
            })),
        },
    );
    remember_session(world, alias);
}

/// Store the token and user id from the last auth response, if successful.
pub(crate) fn remember_session(world: &SharedWorld, alias: &str) {
    let mut ctx = world.borrow_mut();
    let Some(body) = ctx.last_body.clone() else {
        return;
    };
    if let Some(token) = body.get("token").and_then(Value::as_str) {
        ctx.tokens.insert(alias.to_owned(), token.to_owned());
    }
    if let Some(id) = body.pointer("/user/id").and_then(Value::as_str) {
        ctx.user_ids.insert(alias.to_owned(), id.to_owned());
    }
}

pub(crate) fn last_status(world: &SharedWorld) -> u16 {
    world.borrow().last_status.expect("a response was recorded")
}

pub(crate) fn last_body(world: &SharedWorld) -> Value {
    world
        .borrow()
        .last_body
        .clone()
        .expect("a response body was recorded")
}
