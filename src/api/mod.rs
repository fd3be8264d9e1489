use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::FlowCache;
use crate::proxy::BackendClient;

pub mod flows;
pub mod iam;
pub mod remediation;
pub mod s3;
pub mod security_groups;
pub mod server;
pub mod snapshots;
pub mod systems;
pub mod traffic;

pub struct ApiState {
    pub backend: BackendClient,
    pub cache: Arc<dyn FlowCache>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The incoming query string, forwarded to the backend untouched.
pub fn forwarded_query(req: &HttpRequest) -> Option<&str> {
    let q = req.query_string();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// Request bodies are forwarded verbatim; an empty body is not a body.
pub fn forwarded_body(body: actix_web::web::Bytes) -> Option<Vec<u8>> {
    if body.is_empty() {
        None
    } else {
        Some(body.to_vec())
    }
}

// Health check endpoint
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "saferemediate-dashboard"
    }))
}
