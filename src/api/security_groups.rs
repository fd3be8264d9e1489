use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_query, ApiState};
use crate::proxy::to_http_response;

pub async fn get_sg_gap_analysis(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let sg_id = path.into_inner();
    to_http_response(
        state
            .backend
            .forward(
                Method::GET,
                &format!("/api/security-groups/{}/gap-analysis", sg_id),
                forwarded_query(&req),
                None,
            )
            .await,
    )
}
