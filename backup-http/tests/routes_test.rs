mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use backup_core::{
    BackupRecord, BackupService, BackupStore, InMemoryBackupStore, StoreError, StoreResult,
};
use backup_http::server::{AppState, create_app};
use common::create_test_state;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: axum::Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_project(body: String) -> Request<Body> {
    Request::builder()
        .uri("/api/project")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_project(user_id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/project?userId={user_id}"))
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_save_then_retrieve_round_trip() {
    let (state, store) = create_test_state();

    let payload = json!({
        "projectData": { "projectPhases": [{ "id": "p1" }], "logs": [] },
        "userId": "u1",
        "backupType": "AUTO",
        "backupSource": "자동 백업"
    });
    let response = send(create_app(state.clone()), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(response).await;
    assert_eq!(saved["success"], true);
    assert_eq!(saved["message"], "자동 백업이 완료되었습니다.");
    assert_eq!(saved["dataSize"]["워크플로우"], 1);
    assert_eq!(saved["dataSize"]["로그"], 1);
    let backup_id = saved["backupId"].as_str().unwrap().to_string();
    assert!(backup_id.starts_with("backup_u1_"));
    assert_eq!(store.len().await.unwrap(), 1);

    let response = send(create_app(state), get_project("u1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let restored = body_json(response).await;
    assert_eq!(restored["success"], true);
    assert_eq!(restored["projectId"], backup_id);
    assert_eq!(restored["restoreCount"], 1);

    let logs = restored["projectData"]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["type"], "CLOUD_BACKUP");
    assert_eq!(logs[1]["type"], "RESTORE");
    assert_eq!(logs[1]["backupId"], backup_id);
}

#[tokio::test]
async fn test_manual_backup_message_names_the_source() {
    let (state, _store) = create_test_state();

    let payload = json!({
        "projectData": { "projectPhases": [] },
        "userId": "u1",
        "backupType": "MANUAL",
        "backupSource": "사용자 요청"
    });
    let response = send(create_app(state), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(response).await;
    assert_eq!(saved["message"], "수동 백업이 완료되었습니다. (사용자 요청)");
    assert_eq!(saved["backupType"], "MANUAL");
    assert_eq!(saved["dataSize"]["워크플로우"], 0);
}

#[tokio::test]
async fn test_first_retrieve_bootstraps_then_restores() {
    let (state, store) = create_test_state();

    let first = body_json(send(create_app(state.clone()), get_project("fresh")).await).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["isInitialData"], true);
    assert_eq!(first["projectData"]["projectPhases"], json!([]));
    assert_eq!(first["projectData"]["logs"][0]["type"], "SYSTEM_INIT");
    let bootstrap_id = first["projectId"].as_str().unwrap().to_string();
    assert!(bootstrap_id.starts_with("initial_backup_fresh_"));

    let second = body_json(send(create_app(state), get_project("fresh")).await).await;
    assert_eq!(second["success"], true);
    assert_eq!(second["projectId"], bootstrap_id);
    assert!(second.get("isInitialData").is_none());
    assert_eq!(second["restoreCount"], 1);
    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_malformed_snapshot_is_returned_unchanged() {
    let (state, store) = create_test_state();

    let payload = json!({
        "projectData": { "projectPhases": "not a list", "logs": [] },
        "userId": "u2"
    });
    send(create_app(state.clone()), post_project(payload.to_string())).await;
    let before = store.query_by_user("u2").await.unwrap();

    let response = send(create_app(state), get_project("u2")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["dataProtected"], true);
    assert_eq!(body["projectData"]["projectPhases"], "not a list");
    assert!(body.get("restoreCount").is_none());
    assert_eq!(store.query_by_user("u2").await.unwrap(), before);
}

#[tokio::test]
async fn test_save_without_project_data_is_rejected() {
    let (state, store) = create_test_state();

    let payload = json!({ "userId": "u1" });
    let response = send(create_app(state.clone()), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": false, "error": "프로젝트 데이터가 필요합니다." }));

    let payload = json!({ "projectData": "just text", "userId": "u1" });
    let response = send(create_app(state), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "프로젝트 데이터가 필요합니다.");

    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_unparsable_body_gets_its_own_message() {
    let (state, store) = create_test_state();

    let response = send(create_app(state), post_project("{not json".to_string())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "요청 본문을 JSON으로 해석할 수 없습니다." })
    );
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_save_accepts_loosely_typed_bodies() {
    let (state, store) = create_test_state();

    let payload = json!({ "projectData": { "projectPhases": [] }, "userId": 42 });
    let response = send(create_app(state.clone()), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert!(saved["backupId"].as_str().unwrap().starts_with("backup_42_"));

    let request = Request::builder()
        .uri("/api/project")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(
            json!({ "projectData": { "projectPhases": [] }, "userId": "plain" }).to_string(),
        ))
        .unwrap();
    let response = send(create_app(state), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(store.query_by_user("42").await.unwrap().len(), 1);
    assert_eq!(store.query_by_user("plain").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_client_logs_with_numeric_timestamps_survive_the_wire() {
    let (state, _store) = create_test_state();

    let payload = json!({
        "projectData": {
            "projectPhases": [],
            "logs": [{ "timestamp": 1700000000000u64, "message": "local edit", "type": "EDIT" }]
        },
        "userId": "u3"
    });
    let saved = body_json(send(create_app(state.clone()), post_project(payload.to_string())).await).await;
    assert_eq!(saved["dataSize"]["로그"], 2);

    let restored = body_json(send(create_app(state), get_project("u3")).await).await;
    let logs = restored["projectData"]["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0]["timestamp"], 1700000000000u64);
    assert_eq!(logs[1]["type"], "CLOUD_BACKUP");
    assert_eq!(logs[2]["type"], "RESTORE");
}

#[tokio::test]
async fn test_retrieve_without_user_id_is_rejected() {
    let (state, store) = create_test_state();

    for uri in ["/api/project", "/api/project?userId="] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = send(create_app(state.clone()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "사용자 ID가 필요합니다.");
    }

    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_unsupported_method_returns_405() {
    let (state, _store) = create_test_state();

    let request = Request::builder()
        .uri("/api/project")
        .method("PUT")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST, GET");
    assert_eq!(
        body_json(response).await["error"],
        "허용되지 않는 메서드입니다."
    );
}

#[tokio::test]
async fn test_head_is_rejected_without_touching_the_store() {
    let (state, store) = create_test_state();

    let request = Request::builder()
        .uri("/api/project?userId=u9")
        .method("HEAD")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST, GET");
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_preflight_gets_empty_ok_with_cors_headers() {
    let (state, store) = create_test_state();

    let request = Request::builder()
        .uri("/api/project")
        .method("OPTIONS")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_regular_responses_carry_allow_origin() {
    let (state, _store) = create_test_state();

    let request = Request::builder()
        .uri("/api/project?userId=u1")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let (state, _store) = create_test_state();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = send(create_app(state.clone()), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    assert!(doc["paths"].get("/api/project").is_some());
    assert!(doc["paths"]["/api/project"].get("get").is_some());
    assert!(doc["paths"]["/api/project"].get("post").is_some());
}

struct UnavailableStore;

#[async_trait]
impl BackupStore for UnavailableStore {
    async fn put(&self, _key: &str, _record: BackupRecord) -> StoreResult<()> {
        Err(StoreError::Backend("disk full".to_string()))
    }

    async fn query_by_user(&self, _user_id: &str) -> StoreResult<Vec<BackupRecord>> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<BackupRecord>> {
        Ok(None)
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_store_failure_maps_to_500_without_details() {
    let state = AppState::from_service(BackupService::new(Arc::new(UnavailableStore)));

    let payload = json!({ "projectData": { "projectPhases": [] }, "userId": "u1" });
    let response = send(create_app(state.clone()), post_project(payload.to_string())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "서버 오류가 발생했습니다.");
    assert!(!body.to_string().contains("disk full"));

    let response = send(create_app(state), get_project("u1")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

struct PanickingStore;

#[async_trait]
impl BackupStore for PanickingStore {
    async fn put(&self, _key: &str, _record: BackupRecord) -> StoreResult<()> {
        panic!("put exploded");
    }

    async fn query_by_user(&self, _user_id: &str) -> StoreResult<Vec<BackupRecord>> {
        panic!("query exploded");
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<BackupRecord>> {
        Ok(None)
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_handler_panic_becomes_500_with_cors() {
    let state = AppState::from_service(BackupService::new(Arc::new(PanickingStore)));

    let request = Request::builder()
        .uri("/api/project?userId=u1")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = send(create_app(state), request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body = body_json(response).await;
    assert_eq!(body, json!({ "success": false, "error": "서버 오류가 발생했습니다." }));
}

/// Reports no records on the first lookup, then sees what the inner store
/// holds, as when another writer lands between two reads
struct LateStore {
    inner: InMemoryBackupStore,
    queries: AtomicUsize,
}

#[async_trait]
impl BackupStore for LateStore {
    async fn put(&self, key: &str, record: BackupRecord) -> StoreResult<()> {
        self.inner.put(key, record).await
    }

    async fn query_by_user(&self, user_id: &str) -> StoreResult<Vec<BackupRecord>> {
        if self.queries.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(Vec::new());
        }
        self.inner.query_by_user(user_id).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<BackupRecord>> {
        self.inner.get(key).await
    }

    async fn len(&self) -> StoreResult<usize> {
        self.inner.len().await
    }
}

#[tokio::test]
async fn test_records_appearing_mid_bootstrap_are_protected() {
    let inner = InMemoryBackupStore::new();
    let seeded = AppState::new(Arc::new(inner.clone()), Default::default());
    let payload = json!({ "projectData": { "projectPhases": [{ "id": "keep" }] }, "userId": "u5" });
    send(create_app(seeded), post_project(payload.to_string())).await;
    let before = inner.query_by_user("u5").await.unwrap();

    let store = LateStore {
        inner: inner.clone(),
        queries: AtomicUsize::new(0),
    };
    let state = AppState::from_service(BackupService::new(Arc::new(store)));
    let response = send(create_app(state), get_project("u5")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["isEmpty"], true);
    assert_eq!(body["protectedData"], true);
    assert!(body.get("projectData").is_none());
    assert_eq!(inner.query_by_user("u5").await.unwrap(), before);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let store = InMemoryBackupStore::new();
    let state = AppState::new(Arc::new(store.clone()), Default::default());

    let payload = json!({ "projectData": { "projectPhases": [{ "id": "a" }] }, "userId": "alice" });
    send(create_app(state.clone()), post_project(payload.to_string())).await;

    let body = body_json(send(create_app(state), get_project("bob")).await).await;
    assert_eq!(body["isInitialData"], true);
    assert_eq!(store.query_by_user("alice").await.unwrap().len(), 1);
    assert_eq!(store.query_by_user("bob").await.unwrap().len(), 1);
}
