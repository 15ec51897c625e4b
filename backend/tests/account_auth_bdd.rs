//! Behaviour tests for registration, login and bearer token enforcement.
//!
//! Scenarios run the production application wiring over in-memory
//! repositories, real bcrypt hashing and real JWT signing.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "../src/server/app.rs"]
mod app;
#[expect(
    dead_code,
    reason = "server config include exposes builders unused in this integration test"
)]
#[path = "../src/server/config.rs"]
mod server_config;
pub use server_config::ServerConfig;
#[path = "../src/server/state_builders.rs"]
mod state_builders;
// Shared harness has helpers used by other integration suites.
#[allow(dead_code)]
#[path = "support_http/harness.rs"]
mod harness;
#[path = "support_http/common_steps.rs"]
mod common_steps;

use actix_web::http::Method;
use harness::{
    RequestSpec, WorldFixture, last_body, last_status, perform, register, remember_session,
    token_for, unquote,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

#[fixture]
fn world() -> WorldFixture {
    harness::world()
}

#[given("{alias} has registered with email {email} and password {password}")]
fn has_registered(world: &WorldFixture, alias: String, email: String, password: String) {
    let world = world.world();
    register(&world, &unquote(&alias), &unquote(&email), &unquote(&password));
    assert_eq!(last_status(&world), 201, "registration should succeed");
}

#[when("{alias} registers with email {email} and password {password}")]
fn registers(world: &WorldFixture, alias: String, email: String, password: String) {
    register(
        &world.world(),
        &unquote(&alias),
        &unquote(&email),
        &unquote(&password),
    );
}

#[when("{alias} logs in with {login} and password {password}")]
fn logs_in(world: &WorldFixture, alias: String, login: String, password: String) {
    let world = world.world();
    perform(
        &world,
        RequestSpec {
            method: Method::POST,
            path: "/api/auth/login".to_owned(),
            token: None,
            payload: Some(json!({
                "email": unquote(&login),
                "password": unquote(&password),
            })),
        },
    );
    remember_session(&world, &unquote(&alias));
}

#[when("an anonymous client lists trips")]
fn an_anonymous_client_lists_trips(world: &WorldFixture) {
    perform(
        &world.world(),
        RequestSpec {
            method: Method::GET,
            path: "/api/trips".to_owned(),
            token: None,
            payload: None,
        },
    );
}

#[when("{days} days pass")]
fn days_pass(world: &WorldFixture, days: i64) {
    world.world().borrow().clock.advance_days(days);
}

#[when("{alias} lists their trips")]
fn lists_their_trips(world: &WorldFixture, alias: String) {
    let world = world.world();
    let token = token_for(&world, &unquote(&alias));
    perform(
        &world,
        RequestSpec {
            method: Method::GET,
            path: "/api/trips".to_owned(),
            token: Some(token),
            payload: None,
        },
    );
}

#[then("the response carries a bearer token")]
fn the_response_carries_a_bearer_token(world: &WorldFixture) {
    let body = last_body(&world.world());
    let token = body.get("token").and_then(Value::as_str).expect("token");
    assert_eq!(token.split('.').count(), 3, "token should be a compact JWT");
    assert!(body.get("expiresAt").is_some());
}

#[then("the returned user omits the password hash")]
fn the_returned_user_omits_the_password_hash(world: &WorldFixture) {
    let body = last_body(&world.world());
    let user = body.get("user").and_then(Value::as_object).expect("user");
    assert_eq!(user.get("email").and_then(Value::as_str), Some("alice@example.com"));
    assert_eq!(user.get("role").and_then(Value::as_str), Some("member"));
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("passwordHash"));
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Registration issues a token and a safe profile"
)]
fn registration_issues_a_token(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Registering a taken email is rejected"
)]
fn registering_a_taken_email_is_rejected(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Login succeeds with the registered credentials"
)]
fn login_succeeds(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Login with the wrong password is unauthorised"
)]
fn login_with_wrong_password(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Login for an unknown account is not found"
)]
fn login_for_unknown_account(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Requests without a token are rejected"
)]
fn requests_without_a_token(world: WorldFixture) {
    let _ = world;
}

#[scenario(
    path = "tests/features/account_auth.feature",
    name = "Tokens stop working after they expire"
)]
fn tokens_expire(world: WorldFixture) {
    let _ = world;
}
