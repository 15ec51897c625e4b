//! Steps shared by every API scenario suite.

use rstest_bdd_macros::{given, then};
use serde_json::Value;

use crate::harness::{WorldFixture, last_body, last_status, unquote};

#[given("a running PackWise server")]
fn a_running_packwise_server(world: &WorldFixture) {
    let _ = world;
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    assert_eq!(last_status(&world.world()), status);
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &WorldFixture, message: String) {
    let world = world.world();
    let body = last_body(&world);
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some(unquote(&message).as_str())
    );
    let trace_id = world
        .borrow()
        .last_trace_id
        .clone()
        .expect("trace id header");
    assert_eq!(
        body.get("traceId").and_then(Value::as_str),
        Some(trace_id.as_str())
    );
}
