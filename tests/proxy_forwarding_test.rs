use reqwest::Method;
use saferemediate_dashboard::config::BackendConfig;
use saferemediate_dashboard::model::IamGap;
use saferemediate_dashboard::proxy::{to_http_response, BackendClient, ProxyError};

fn client_for(url: String) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: url,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn success_body_and_status_pass_through_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"[{"id":"snap-1"},{"id":"snap-2"}]"#;
    let mock = server
        .mock("GET", "/api/snapshots")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(server.url());
    let response = client
        .forward(Method::GET, "/api/snapshots", None, None)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, body.as_bytes());
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_success_status_is_preserved() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/s3-buckets/remediate")
        .with_status(201)
        .with_body(r#"{"snapshot_id":"snap-9"}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let response = client
        .forward(
            Method::POST,
            "/api/s3-buckets/remediate",
            None,
            Some(br#"{"bucket":"assets"}"#.to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn query_string_is_forwarded_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/security-groups/sg-1/gap-analysis?days=7")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(server.url());
    client
        .forward(
            Method::GET,
            "/api/security-groups/sg-1/gap-analysis",
            Some("days=7"),
            None,
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn backend_detail_field_becomes_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/iam-roles/missing/gap-analysis")
        .with_status(404)
        .with_body(r#"{"detail":"Role not found"}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let err = client
        .forward(Method::GET, "/api/iam-roles/missing/gap-analysis", None, None)
        .await
        .unwrap_err();

    match err {
        ProxyError::Backend { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Role not found");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn backend_error_field_is_second_choice() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/snapshots")
        .with_status(500)
        .with_body(r#"{"error":"neo4j unavailable"}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let err = client
        .forward(Method::GET, "/api/snapshots", None, None)
        .await
        .unwrap_err();

    match err {
        ProxyError::Backend { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "neo4j unavailable");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn unparsable_error_body_gets_generic_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/snapshots")
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let client = client_for(server.url());
    let err = client
        .forward(Method::GET, "/api/snapshots", None, None)
        .await
        .unwrap_err();

    match err {
        ProxyError::Backend { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Backend request failed with status 503");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_backend_maps_to_transport_error_and_500() {
    // Port 9 (discard) is never listening.
    let client = client_for("http://127.0.0.1:9".to_string());
    let result = client.forward(Method::GET, "/api/snapshots", None, None).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ProxyError::Transport(ref m) if !m.is_empty()));

    let response = to_http_response(Err(err));
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn backend_error_status_survives_into_http_response() {
    let response = to_http_response(Err(ProxyError::Backend {
        status: 404,
        message: "Role not found".to_string(),
    }));
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn typed_get_json_deserializes_backend_payloads() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/iam-analysis/gaps/payments")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"role_name":"app-1-role","allowed_permissions":40,
                 "used_permissions":10,"unused_permissions":30,
                 "usage_percent":25.0,"status":"warning"}]"#,
        )
        .create_async()
        .await;

    let client = client_for(server.url());
    let gaps: Vec<IamGap> = client
        .get_json("/api/iam-analysis/gaps/payments")
        .await
        .unwrap();

    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].role_name, "app-1-role");
    assert_eq!(gaps[0].unused_permissions, 30);
}
