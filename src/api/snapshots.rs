use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn list_snapshots(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(Method::GET, "/api/snapshots", forwarded_query(&req), None)
            .await,
    )
}

pub async fn list_iam_snapshots(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(Method::GET, "/api/iam-snapshots", forwarded_query(&req), None)
            .await,
    )
}

pub async fn get_iam_role_snapshot(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let snapshot_id = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                &format!("/api/iam-roles/snapshots/{}", snapshot_id),
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn delete_iam_role_snapshot(
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> impl Responder {
    let snapshot_id = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::DELETE,
                &format!("/api/iam-roles/snapshots/{}", snapshot_id),
                None,
                None,
            )
            .await,
    )
}
