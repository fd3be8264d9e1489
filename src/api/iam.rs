use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn get_role_gap_analysis(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let role_name = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                &format!("/api/iam-roles/{}/gap-analysis", role_name),
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn get_system_iam_gaps(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let system_name = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                &format!("/api/iam-analysis/gaps/{}", system_name),
                forwarded_query(&req),
                None,
            )
            .await,
    )
}
