//! Root greeting used by uptime checks and humans poking at the API.

use actix_web::{get, web};

pub const WELCOME_MESSAGE: &str = "Welcome to the PackWise API!";

#[utoipa::path(
    get,
    path = "/",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Greeting", body = String))
)]
#[get("/")]
pub async fn welcome() -> web::Json<&'static str> {
    web::Json(WELCOME_MESSAGE)
}
