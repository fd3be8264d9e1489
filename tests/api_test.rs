use actix_web::{test, web, App};
use std::sync::Arc;

use saferemediate_dashboard::api::flows::get_flows;
use saferemediate_dashboard::api::{health, ApiState};
use saferemediate_dashboard::cache::{CacheKey, FlowCache, MemoryCache};
use saferemediate_dashboard::config::BackendConfig;
use saferemediate_dashboard::flows::builder::{build_full_stack_flows, FlowBuildContext};
use saferemediate_dashboard::model::GraphNode;
use saferemediate_dashboard::proxy::BackendClient;

fn state_with_cache(cache: Arc<MemoryCache>) -> web::Data<ApiState> {
    // Port 9 (discard) is never listening: any request that reaches the
    // backend in these tests is a bug or an expected failure.
    let backend = BackendClient::new(&BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
    })
    .unwrap();
    web::Data::new(ApiState { backend, cache })
}

#[actix_rt::test]
async fn health_reports_ok() {
    let app = test::init_service(App::new().route("/health", web::get().to(health))).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "saferemediate-dashboard");
}

#[actix_rt::test]
async fn fresh_cache_entry_short_circuits_the_backend() {
    let cache = Arc::new(MemoryCache::new(300));
    let ctx = FlowBuildContext::new(
        vec![
            GraphNode::new("i-1", "app-1", "ec2"),
            GraphNode::new("db-1", "payments-db", "rds"),
        ],
        vec![],
        vec![],
        vec![],
    );
    let flows = build_full_stack_flows(&ctx);
    let now = chrono::Utc::now().timestamp() as u64;
    cache.set(&CacheKey::new("payments", "24h"), &flows, now);

    let state = state_with_cache(cache);
    let app = test::init_service(
        App::new()
            .app_data(state)
            .route("/api/flows", web::get().to(get_flows)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/flows?system_name=payments&window=24h")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["from_cache"], true);
    assert_eq!(body["flows"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["flows"][0]["path_description"],
        "Internet → app-1 → payments-db"
    );
}

#[actix_rt::test]
async fn cold_cache_with_unreachable_backend_yields_error_envelope() {
    let state = state_with_cache(Arc::new(MemoryCache::new(300)));
    let app = test::init_service(
        App::new()
            .app_data(state)
            .route("/api/flows", web::get().to(get_flows)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/flows?system_name=payments")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().len() > 0);
}
