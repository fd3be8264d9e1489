use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::ApiState;
use crate::cache::CacheKey;
use crate::flows::builder::build_full_stack_flows;
use crate::flows::{load_node_details, FlowSources};
use crate::model::Flow;
use crate::proxy::to_http_response;

const DEFAULT_WINDOW: &str = "24h";

#[derive(Debug, Deserialize)]
pub struct FlowQuery {
    pub system_name: String,
    pub window: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlowsResponse {
    pub system_name: String,
    pub window: String,
    pub from_cache: bool,
    pub flows: Vec<Flow>,
}

fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Build (or serve from cache) the flow strips for one system. Flows are
/// ephemeral view-models; the cache only exists to paint a non-empty screen
/// while a fresh build runs against the backend.
pub async fn get_flows(state: web::Data<ApiState>, query: web::Query<FlowQuery>) -> impl Responder {
    let window = query
        .window
        .clone()
        .unwrap_or_else(|| DEFAULT_WINDOW.to_string());
    let key = CacheKey::new(&query.system_name, &window);
    let now = now_unix();

    if let Some(flows) = state.cache.get(&key, now) {
        log::debug!("Serving cached flows for {} ({})", key.system_name, window);
        return HttpResponse::Ok().json(FlowsResponse {
            system_name: query.system_name.clone(),
            window,
            from_cache: true,
            flows,
        });
    }

    let sources = FlowSources::new(&state.backend);
    match sources.load(&query.system_name, &window).await {
        Ok(ctx) => {
            let flows = build_full_stack_flows(&ctx);
            state.cache.set(&key, &flows, now);
            HttpResponse::Ok().json(FlowsResponse {
                system_name: query.system_name.clone(),
                window,
                from_cache: false,
                flows,
            })
        }
        Err(e) => to_http_response(Err(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct NodeDetailsQuery {
    pub system_name: String,
}

pub async fn get_node_details(
    state: web::Data<ApiState>,
    path: web::Path<String>,
    query: web::Query<NodeDetailsQuery>,
) -> impl Responder {
    let node_id = path.into_inner();
    match load_node_details(&state.backend, &query.system_name, &node_id).await {
        Ok(details) => HttpResponse::Ok().json(details),
        Err(e) => to_http_response(Err(e)),
    }
}
