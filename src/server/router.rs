//! HTTP and WebSocket routing configuration.
//!
//! One WebSocket endpoint carries the whole game protocol; a small status
//! endpoint reports liveness.

use actix_web::{HttpResponse, Responder, web};

use crate::server::session::ws_connect;

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_connect))
        .service(web::resource("/health").to(health));
}
