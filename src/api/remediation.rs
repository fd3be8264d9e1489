use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_body, forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn get_timeline(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                "/api/remediation-history/timeline",
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn rollback_event(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let event_id = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::POST,
                &format!("/api/remediation-history/events/{}/rollback", event_id),
                forwarded_query(&req),
                forwarded_body(body),
            )
            .await,
    )
}

/// CSV export: passed through byte-for-byte with the backend's content type.
pub async fn export(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                "/api/remediation-history/export",
                forwarded_query(&req),
                None,
            )
            .await,
    )
}
