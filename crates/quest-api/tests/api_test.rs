//! 路由级测试：通过 tower oneshot 直接驱动完整路由

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use quest_api::{AppState, build_router};
use quest_core::{User, UserRole};
use quest_shared::config::{AuthConfig, OAuthConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: &str = "quest-admin-dev-token";
const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

fn user(id: &str, role: UserRole) -> User {
    User {
        id: id.to_string(),
        first_name: id.to_string(),
        last_name: "Tester".to_string(),
        username: None,
        email: None,
        role,
        points: 0,
        completed_quests: Vec::new(),
        social_profiles: Default::default(),
    }
}

fn setup_with(oauth: OAuthConfig) -> (Router, AppState) {
    let state = AppState::new(&AuthConfig::default(), oauth);
    state.register_user(user("alice", UserRole::User), ALICE);
    state.register_user(user("bob", UserRole::User), BOB);
    (build_router(state.clone()), state)
}

fn setup() -> (Router, AppState) {
    setup_with(OAuthConfig {
        app_base_url: OAuthConfig::DEFAULT_APP_BASE_URL.to_string(),
        ..Default::default()
    })
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn quest_body(title: &str, submission_type: &str) -> Value {
    json!({
        "title": title,
        "description": "Complete the task",
        "category": "social",
        "difficulty": "easy",
        "reward": 30,
        "status": "active",
        "submissionType": submission_type,
        "requirements": ["Do it"]
    })
}

async fn create_quest(app: &Router, title: &str, submission_type: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/quests",
        Some(ADMIN),
        Some(quest_body(title, submission_type)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn submit(app: &Router, token: &str, quest_id: &str, content: Value) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        &format!("/api/quests/{quest_id}/submissions"),
        Some(token),
        Some(json!({ "content": content })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup();
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_quest_admin_routes_require_admin() {
    let (app, _) = setup();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/quests",
        None,
        Some(quest_body("x", "text")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/quests",
        Some(ALICE),
        Some(quest_body("x", "text")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/quests", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_quest_crud_and_filters() {
    let (app, _) = setup();
    let id = create_quest(&app, "Post a link", "url").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/quests",
        Some(ADMIN),
        Some(json!({
            "title": "Learn",
            "description": "Read docs",
            "category": "education",
            "difficulty": "hard",
            "reward": 10,
            "submissionType": "text"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "draft");

    let (_, body) = call(&app, Method::GET, "/api/quests?category=social", None, None).await;
    let quests = body["data"].as_array().unwrap();
    assert_eq!(quests.len(), 1);
    assert_eq!(quests[0]["id"], id.as_str());

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/quests/{id}"),
        Some(ADMIN),
        Some(json!({ "reward": 75 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reward"], 75);
    assert_eq!(body["data"]["title"], "Post a link");

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/quests/{id}"),
        Some(ADMIN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "expired");

    let (status, body) = call(&app, Method::GET, "/api/quests/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "QUEST_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_quest_form_rejected() {
    let (app, _) = setup();
    let mut body = quest_body("  ", "text");
    body["requirements"] = json!(["ok", ""]);

    let (status, body) = call(&app, Method::POST, "/api/quests", Some(ADMIN), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quest_update_rejects_blank_title() {
    let (app, state) = setup();
    let id = create_quest(&app, "Keep me", "text").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/quests/{id}"),
        Some(ADMIN),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(state.quests.get(&id).unwrap().title, "Keep me");
}

#[tokio::test]
async fn test_quest_update_null_end_date_clears_window() {
    let (app, state) = setup();
    let mut body = quest_body("Limited", "text");
    body["endDate"] = json!("2999-01-01T00:00:00Z");
    let (status, body) = call(&app, Method::POST, "/api/quests", Some(ADMIN), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/quests/{id}"),
        Some(ADMIN),
        Some(json!({ "reward": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.quests.get(&id).unwrap().end_date.is_some());

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/quests/{id}"),
        Some(ADMIN),
        Some(json!({ "endDate": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("endDate").is_none());
    assert!(state.quests.get(&id).unwrap().end_date.is_none());
}

#[tokio::test]
async fn test_submit_and_approve_credits_user() {
    let (app, state) = setup();
    let quest_id = create_quest(&app, "Share", "url").await;

    let (status, body) = submit(
        &app,
        ALICE,
        &quest_id,
        json!({"type": "url", "value": " https://x.com/alice/status/1 "}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["content"]["value"], "https://x.com/alice/status/1");
    let submission_id = body["data"]["id"].as_str().unwrap().to_string();

    // 待审期间不允许重复提交
    let (status, body) = submit(
        &app,
        ALICE,
        &quest_id,
        json!({"type": "url", "value": "https://x.com/alice/status/2"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_SUBMISSION");

    let review_uri = format!("/api/submissions/{submission_id}/review");
    let (status, _) = call(
        &app,
        Method::POST,
        &review_uri,
        Some(ALICE),
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::POST,
        &review_uri,
        Some(ADMIN),
        Some(json!({"status": "approved", "feedback": "Great job", "points": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["feedback"], "Great job");
    assert_eq!(body["data"]["rewardEarned"], 50);
    assert_eq!(body["data"]["validatedBy"], "admin");

    let alice = state.users.get("alice").unwrap();
    assert_eq!(alice.points, 50);
    assert!(alice.has_completed(&quest_id));

    let (status, body) = call(
        &app,
        Method::POST,
        &review_uri,
        Some(ADMIN),
        Some(json!({"status": "rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (_, body) = call(&app, Method::GET, "/api/users/me", Some(ALICE), None).await;
    assert_eq!(body["data"]["points"], 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_accept_only_one() {
    let (app, state) = setup();
    let quest_id = create_quest(&app, "Race", "url").await;

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            let quest_id = quest_id.clone();
            tokio::spawn(async move {
                let content = json!({"type": "url", "value": format!("https://x.com/alice/status/{i}")});
                submit(&app, ALICE, &quest_id, content).await.0
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::CONFLICT)
            .count(),
        15
    );
    assert_eq!(
        state
            .submissions
            .list_by(|s| s.quest_id == quest_id)
            .len(),
        1
    );
}

#[tokio::test]
async fn test_approval_without_points_uses_quest_reward() {
    let (app, state) = setup();
    let quest_id = create_quest(&app, "Write", "text").await;
    let (_, body) = submit(&app, BOB, &quest_id, json!({"type": "text", "value": "done"})).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/submissions/{id}/review"),
        Some(ADMIN),
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rewardEarned"], 30);
    assert_eq!(state.users.get("bob").unwrap().points, 30);
}

#[tokio::test]
async fn test_submission_type_must_match_quest() {
    let (app, _) = setup();
    let quest_id = create_quest(&app, "Account", "account-id").await;

    let (status, body) = submit(
        &app,
        ALICE,
        &quest_id,
        json!({"type": "text", "value": "0.0.1234"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CONTENT");
}

#[tokio::test]
async fn test_needs_revision_then_resubmit() {
    let (app, _) = setup();
    let quest_id = create_quest(&app, "Tx", "transaction-id").await;
    let (_, body) = submit(
        &app,
        ALICE,
        &quest_id,
        json!({"type": "transaction-id", "value": "0.0.1@1"}),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/submissions/{id}/review"),
        Some(ADMIN),
        Some(json!({"status": "needs-revision", "feedback": "wrong network"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "needs-revision");

    let resubmit_uri = format!("/api/submissions/{id}/resubmit");
    let content = json!({"content": {"type": "transaction-id", "value": "0.0.1@2"}});

    let (status, _) = call(&app, Method::POST, &resubmit_uri, Some(BOB), Some(content.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::POST, &resubmit_uri, Some(ALICE), Some(content.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["feedback"], "wrong network");

    let (status, body) = call(&app, Method::POST, &resubmit_uri, Some(ALICE), Some(content)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOT_AWAITING_REVISION");
}

#[tokio::test]
async fn test_submission_listing_scoped_to_caller() {
    let (app, _) = setup();
    let quest_id = create_quest(&app, "Say hi", "text").await;
    submit(&app, ALICE, &quest_id, json!({"type": "text", "value": "hi"})).await;
    submit(&app, BOB, &quest_id, json!({"type": "text", "value": "hello"})).await;

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/submissions?userId=bob",
        Some(ALICE),
        None,
    )
    .await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["userId"], "alice");

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/submissions?status=pending",
        Some(ADMIN),
        None,
    )
    .await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    let submitted_at = |v: &Value| {
        chrono::DateTime::parse_from_rfc3339(v["submittedAt"].as_str().unwrap()).unwrap()
    };
    assert!(submitted_at(&list[0]) >= submitted_at(&list[1]));

    let (status, _) = call(&app, Method::GET, "/api/submissions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_badge_crud_and_validation() {
    let (app, _) = setup();
    let badge = json!({
        "name": "Pioneer",
        "description": "First quest done",
        "rarity": "epic",
        "points": 100,
        "maxToObtain": 0,
        "isActive": true
    });

    let (status, body) = call(&app, Method::POST, "/api/badges", Some(ADMIN), Some(badge.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let mut valid = badge.clone();
    valid["maxToObtain"] = json!(10);
    let (status, _) = call(&app, Method::POST, "/api/badges", Some(ALICE), Some(valid.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::POST, "/api/badges", Some(ADMIN), Some(valid.clone())).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    valid["rarity"] = json!("legendary");
    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/badges/{id}"),
        Some(ADMIN),
        Some(valid),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rarity"], "legendary");

    let (_, body) = call(&app, Method::GET, "/api/badges", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/badges/{id}");
    let (status, _) = call(&app, Method::DELETE, &uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, Method::DELETE, &uri, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BADGE_NOT_FOUND");
}

#[tokio::test]
async fn test_user_routes() {
    let (app, _) = setup();

    let (status, _) = call(&app, Method::GET, "/api/users", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/users", Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = call(&app, Method::GET, "/api/users/me", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "alice");
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_discord_url_requires_client_id() {
    let (app, _) = setup();
    let (status, body) = call(&app, Method::GET, "/api/auth/discord", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "OAUTH_NOT_CONFIGURED");

    let (app, _) = setup_with(OAuthConfig {
        discord_client_id: Some("1234".into()),
        discord_redirect_uri: None,
        app_base_url: "http://localhost:3000".into(),
    });
    let (status, body) = call(&app, Method::GET, "/api/auth/discord", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://discord.com/api/oauth2/authorize?client_id=1234"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fauth%2Fdiscord%2Fcallback"));

    let parsed = url::Url::parse(url).unwrap();
    let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "1234");
    assert_eq!(
        params["redirect_uri"],
        "http://localhost:3000/api/auth/discord/callback"
    );
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["scope"], "identify");
    assert_eq!(params["state"].len(), 16);
    assert!(params["state"].chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_discord_url_encodes_custom_redirect() {
    let (app, _) = setup_with(OAuthConfig {
        discord_client_id: Some("app id&x=1".into()),
        discord_redirect_uri: Some("https://quests.example.com/cb?from=discord".into()),
        app_base_url: "https://quests.example.com".into(),
    });
    let (status, body) = call(&app, Method::GET, "/api/auth/discord", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let parsed = url::Url::parse(body["data"]["url"].as_str().unwrap()).unwrap();
    assert_eq!(parsed.host_str(), Some("discord.com"));
    let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
    assert_eq!(params.len(), 5);
    assert_eq!(params["client_id"], "app id&x=1");
    assert_eq!(params["redirect_uri"], "https://quests.example.com/cb?from=discord");
}

#[tokio::test]
async fn test_discord_callback_redirects_to_profile() {
    let (app, _) = setup();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/discord/callback?code=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://localhost:3000/profile?discord=connected"
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/discord/callback?error=access_denied")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://localhost:3000/profile?discord=error"
    );
}
