use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn get_behavioral_summary(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let system = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                &format!("/api/systems/{}/behavioral-summary", system),
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn get_dependency_graph(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                "/api/dependency-map/graph",
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn get_dependency_map_v2(
    state: web::Data<ApiState>,
    req: HttpRequest,
) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                "/api/dependency-map/v2",
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn run_collector(
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> impl Responder {
    let collector_name = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::POST,
                &format!("/api/collectors/run/{}", collector_name),
                None,
                None,
            )
            .await,
    )
}
