//! Canned payloads served by the mock server.

use serde_json::{Value, json};

pub const MOCK_PROJECT_ID: &str = "mock_backup_dev_user_1700000000000";
pub const MOCK_TIMESTAMP: &str = "2023-11-14T22:13:20.000Z";

pub fn project_data() -> Value {
    json!({
        "projectPhases": [
            {
                "id": "phase_1",
                "name": "기획",
                "tasks": [
                    { "id": "task_1", "title": "요구사항 정리", "done": true },
                    { "id": "task_2", "title": "일정 수립", "done": false }
                ]
            },
            {
                "id": "phase_2",
                "name": "개발",
                "tasks": [
                    { "id": "task_3", "title": "API 구현", "done": false }
                ]
            }
        ],
        "logs": [
            {
                "timestamp": MOCK_TIMESTAMP,
                "message": "클라우드 백업 (AUTO - 자동 백업)",
                "type": "CLOUD_BACKUP",
                "backupId": MOCK_PROJECT_ID
            }
        ],
        "version": "1.0.0"
    })
}

pub fn retrieve_response(retrieved_at: &str) -> Value {
    json!({
        "success": true,
        "projectId": MOCK_PROJECT_ID,
        "projectData": project_data(),
        "retrievedAt": retrieved_at,
        "message": "(개발 모드) 목 데이터를 반환합니다."
    })
}

pub fn save_response(backup_id: &str, saved_at: &str, backup_type: &str, backup_source: &str) -> Value {
    json!({
        "success": true,
        "backupId": backup_id,
        "message": "(개발 모드) 백업이 저장된 것처럼 응답합니다.",
        "savedAt": saved_at,
        "backupType": backup_type,
        "backupSource": backup_source,
        "dataSize": { "워크플로우": 2, "로그": 1 }
    })
}

pub fn backup_list_response() -> Value {
    json!({
        "success": true,
        "backups": [
            {
                "backupId": MOCK_PROJECT_ID,
                "timestamp": MOCK_TIMESTAMP,
                "backupType": "AUTO",
                "backupSource": "자동 백업",
                "workflowCount": 2
            },
            {
                "backupId": "mock_backup_dev_user_1699990000000",
                "timestamp": "2023-11-14T19:26:40.000Z",
                "backupType": "MANUAL",
                "backupSource": "수동 백업",
                "workflowCount": 1
            }
        ]
    })
}

pub fn backup_created_response(backup_id: &str, created_at: &str) -> Value {
    json!({
        "success": true,
        "backupId": backup_id,
        "createdAt": created_at,
        "message": "(개발 모드) 백업 요청이 처리되었습니다."
    })
}
