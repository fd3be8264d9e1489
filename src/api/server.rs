use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpResponse, HttpServer};
use std::fs;
use std::sync::Arc;

use crate::api::flows::{get_flows, get_node_details};
use crate::api::iam::{get_role_gap_analysis, get_system_iam_gaps};
use crate::api::remediation::{export, get_timeline, rollback_event};
use crate::api::s3::{bucket_subresource, remediate, rollback};
use crate::api::security_groups::get_sg_gap_analysis;
use crate::api::snapshots::{
    delete_iam_role_snapshot, get_iam_role_snapshot, list_iam_snapshots, list_snapshots,
};
use crate::api::systems::{
    get_behavioral_summary, get_dependency_graph, get_dependency_map_v2, run_collector,
};
use crate::api::traffic::{get_traffic_data, get_xray_service_map, get_xray_traces};
use crate::api::{health, ApiState};
use crate::cache::DiskCache;
use crate::config::Config;
use crate::proxy::BackendClient;

async fn index_handler() -> actix_web::Result<HttpResponse> {
    let content = fs::read_to_string("./static/index.html")
        .unwrap_or_else(|_| "<h1>UI not found</h1>".to_string());
    Ok(HttpResponse::Ok().content_type("text/html").body(content))
}

pub async fn start_server(config: Config) -> std::io::Result<()> {
    let backend = BackendClient::new(&config.backend)
        .expect("Failed to initialize backend client");
    let cache = Arc::new(DiskCache::new(&config.cache.dir, config.cache.ttl_secs));

    let api_state = web::Data::new(ApiState {
        backend,
        cache,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(api_state.clone())
            .route("/health", web::get().to(health))
            // Serve static files for UI
            .service(Files::new("/static", "./static").show_files_listing())
            // Serve index.html for root path
            .service(web::resource("/").route(web::get().to(index_handler)))
            .service(
                web::scope("/api")
                    // Snapshot endpoints
                    .route("/snapshots", web::get().to(list_snapshots))
                    .route("/iam-snapshots", web::get().to(list_iam_snapshots))
                    .route("/iam-roles/snapshots/{id}", web::get().to(get_iam_role_snapshot))
                    .route("/iam-roles/snapshots/{id}", web::delete().to(delete_iam_role_snapshot))
                    // IAM gap analysis
                    .route("/iam-roles/{role_name}/gap-analysis", web::get().to(get_role_gap_analysis))
                    .route("/iam-analysis/gaps/{system_name}", web::get().to(get_system_iam_gaps))
                    // Security group gap analysis
                    .route("/security-groups/{sg_id}/gap-analysis", web::get().to(get_sg_gap_analysis))
                    // Dependency map
                    .route("/dependency-map/graph", web::get().to(get_dependency_graph))
                    .route("/dependency-map/v2", web::get().to(get_dependency_map_v2))
                    // Remediation history
                    .route("/remediation-history/timeline", web::get().to(get_timeline))
                    .route("/remediation-history/events/{id}/rollback", web::post().to(rollback_event))
                    .route("/remediation-history/export", web::get().to(export))
                    // S3 buckets
                    .route("/s3-buckets/remediate", web::post().to(remediate))
                    .route("/s3-buckets/rollback", web::post().to(rollback))
                    .route("/s3-buckets/{bucket}/{subresource}", web::get().to(bucket_subresource))
                    .route("/s3-buckets/{bucket}/{subresource}", web::post().to(bucket_subresource))
                    // Systems
                    .route("/systems/{system}/behavioral-summary", web::get().to(get_behavioral_summary))
                    .route("/collectors/run/{collector_name}", web::post().to(run_collector))
                    // Traffic and tracing
                    .route("/traffic-data", web::get().to(get_traffic_data))
                    .route("/xray/service-map", web::get().to(get_xray_service_map))
                    .route("/xray/traces", web::get().to(get_xray_traces))
                    // Flow view-models (built locally, cached)
                    .route("/flows", web::get().to(get_flows))
                    .route("/flows/nodes/{node_id}/details", web::get().to(get_node_details))
            )
    })
    .bind(format!("{}:{}", config.server.host, config.server.port))?
    .run()
    .await
}
