use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn get_traffic_data(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(Method::GET, "/api/traffic-data", forwarded_query(&req), None)
            .await,
    )
}

pub async fn get_xray_service_map(
    state: web::Data<ApiState>,
    req: HttpRequest,
) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                "/api/xray/service-map",
                forwarded_query(&req),
                None,
            )
            .await,
    )
}

pub async fn get_xray_traces(state: web::Data<ApiState>, req: HttpRequest) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(Method::GET, "/api/xray/traces", forwarded_query(&req), None)
            .await,
    )
}
