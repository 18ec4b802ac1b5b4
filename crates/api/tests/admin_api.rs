//! HTTP-level integration tests for the `/admin` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_admin_user, create_provider_user, get_auth, put_json_auth, session_token};
use sqlx::PgPool;

use clipbrief_db::models::usage_record::CreateUsageRecord;
use clipbrief_db::repositories::UsageRepo;

/// A regular user is rejected from every admin route with 403.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_routes_reject_non_admin(pool: PgPool) {
    let user = create_provider_user(&pool, 20, "pleb").await;
    let token = session_token(user.id);

    for uri in [
        "/api/v1/admin/users",
        "/api/v1/admin/users/1/usage",
        "/api/v1/admin/usage/recent",
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "uri: {uri}");
    }

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "user_id": user.id, "limit_seconds": 60 });
    let response = put_json_auth(app, "/api/v1/admin/users/limit", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Admin user listing is paginated and hides password hashes.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_users(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    create_provider_user(&pool, 21, "alpha").await;
    create_provider_user(&pool, 22, "bravo").await;
    let token = session_token(admin.id);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/users?page=1&page_size=2", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["users"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["total"], 3);
    assert!(
        json["users"][0].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

/// Usage detail reports quota standing and the user's recent records.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_usage_detail(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    let user = create_provider_user(&pool, 23, "watched").await;

    let record = CreateUsageRecord {
        user_id: user.id,
        video_name: "talk.mp4".to_string(),
        prompt: "Key points".to_string(),
        summary_length: 300,
        processing_secs: 45,
    };
    UsageRepo::create(&pool, &record)
        .await
        .expect("record creation should succeed");
    clipbrief_db::repositories::UserRepo::add_consumption(&pool, user.id, 45)
        .await
        .expect("consumption should succeed");

    let token = session_token(admin.id);
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/admin/users/{}/usage", user.id),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["remaining_secs"], 3600 - 45);
    assert_eq!(json["total_records"], 1);
    assert_eq!(json["records"][0]["video_name"], "talk.mp4");
    assert_eq!(json["records"][0]["processing_secs"], 45);
}

/// Usage detail for an unknown user is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_usage_unknown_user(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    let token = session_token(admin.id);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/users/999999/usage", &token).await;

    common::assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

/// Recent usage spans all users, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recent_usage_across_users(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    let a = create_provider_user(&pool, 24, "one").await;
    let b = create_provider_user(&pool, 25, "two").await;

    for (user_id, name) in [(a.id, "first.mp4"), (b.id, "second.mp4")] {
        let record = CreateUsageRecord {
            user_id,
            video_name: name.to_string(),
            prompt: "Summarize".to_string(),
            summary_length: 10,
            processing_secs: 5,
        };
        UsageRepo::create(&pool, &record)
            .await
            .expect("record creation should succeed");
    }

    let token = session_token(admin.id);
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/usage/recent", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["records"].as_array().map(Vec::len), Some(2));
}

/// Setting a limit updates the cap without touching consumption.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_limit(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    let user = create_provider_user(&pool, 26, "limited").await;
    clipbrief_db::repositories::UserRepo::add_consumption(&pool, user.id, 100)
        .await
        .expect("consumption should succeed");

    let token = session_token(admin.id);
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "user_id": user.id, "limit_seconds": 7200 });
    let response = put_json_auth(app, "/api/v1/admin/users/limit", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["usage_limit_secs"], 7200);
    assert_eq!(
        json["usage_consumed_secs"], 100,
        "limit changes must not touch consumption"
    );
}

/// A negative limit is rejected as validation failure.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_limit_rejects_negative(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;
    let user = create_provider_user(&pool, 27, "victim").await;

    let token = session_token(admin.id);
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "user_id": user.id, "limit_seconds": -1 });
    let response = put_json_auth(app, "/api/v1/admin/users/limit", body, &token).await;

    common::assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

/// Updating the limit of an unknown user is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_limit_unknown_user(pool: PgPool) {
    let (admin, _password) = create_admin_user(&pool, "root").await;

    let token = session_token(admin.id);
    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "user_id": 424242, "limit_seconds": 60 });
    let response = put_json_auth(app, "/api/v1/admin/users/limit", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
