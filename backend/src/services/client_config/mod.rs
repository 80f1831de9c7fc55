//! `GET /api/config`: the settings the frontend needs before it can talk to the
//! upload and link-generation services.

use actix_web::web::{get, scope, Data};
use actix_web::{HttpResponse, Responder, Scope};
use common::config::ClientConfig;

const API_PATH: &str = "/api/config";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process(config: Data<ClientConfig>) -> impl Responder {
    HttpResponse::Ok().json(config.get_ref())
}
