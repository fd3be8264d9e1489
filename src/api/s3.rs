use actix_web::{web, HttpRequest, Responder};
use reqwest::Method;

use crate::api::{forwarded_body, forwarded_query, ApiState};
use crate::proxy::to_http_response;

/// GET and POST on the per-bucket sub-resources (`gap-analysis`, `policy`,
/// `analysis`) share one forwarding shape; the sub-resource comes from the
/// matched route path.
pub async fn bucket_subresource(
    state: web::Data<ApiState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> impl Responder {
    let (bucket, subresource) = path.into_inner();
    let method = Method::from_bytes(req.method().as_str().as_bytes()).unwrap_or(Method::GET);
    to_http_response(
        state
            .backend
            .forward(
                method,
                &format!("/api/s3-buckets/{}/{}", bucket, subresource),
                forwarded_query(&req),
                forwarded_body(body),
            )
            .await,
    )
}

pub async fn remediate(
    state: web::Data<ApiState>,
    req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::POST,
                "/api/s3-buckets/remediate",
                forwarded_query(&req),
                forwarded_body(body),
            )
            .await,
    )
}

pub async fn rollback(
    state: web::Data<ApiState>,
    req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    to_http_response(
        state
            .backend
            .forward(
                Method::POST,
                "/api/s3-buckets/rollback",
                forwarded_query(&req),
                forwarded_body(body),
            )
            .await,
    )
}
