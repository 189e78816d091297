//! Submit an idea over HTTP, then vote for it through the EventSub webhook.

use std::sync::Arc;

use api_adapters::{router, AppState, Metrics};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use domains::{DomainError, IdeaNotifier, MockIdeaNotifier};
use integration_tests::{
    correlator, redemption_body, seeded_repo, signed_headers, submissions, verifier,
};
use notify_adapters::NoopNotifier;
use serde_json::{json, Value};
use storage_adapters::InMemoryIdeaRepository;
use tower::ServiceExt;

fn app(repo: Arc<InMemoryIdeaRepository>, notifier: Arc<dyn IdeaNotifier>) -> Router {
    router(AppState {
        correlator: Arc::new(correlator(repo.clone())),
        submissions: Arc::new(submissions(repo, notifier)),
        verifier: Arc::new(verifier()),
        metrics: Arc::new(Metrics::new()),
    })
}

fn submit(username: &str, idea: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ideas")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "username": username, "idea": idea }).to_string(),
        ))
        .unwrap()
}

fn list() -> Request<Body> {
    Request::builder().uri("/api/ideas").body(Body::empty()).unwrap()
}

fn webhook(body: &Value) -> Request<Body> {
    let raw = serde_json::to_vec(body).unwrap();
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/twitch/webhook")
        .header("content-type", "application/json");
    for (name, value) in signed_headers("notification", &raw) {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(raw)).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submitted_idea_collects_votes_by_code() {
    let repo = seeded_repo(&[]);
    let mut notifier = MockIdeaNotifier::new();
    notifier
        .expect_idea_submitted()
        .withf(|idea| idea.username == "alice" && idea.votes == 0)
        .times(1)
        .returning(|_| Ok(()));
    let app = app(repo.clone(), Arc::new(notifier));

    let response = app
        .clone()
        .oneshot(submit("  alice ", "Play the game blindfolded"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["idea"]["id"], "1733333333333");
    assert_eq!(created["idea"]["username"], "alice");
    assert_eq!(created["idea"]["status"], "pending");
    assert_eq!(created["idea"]["votes"], 0);

    let response = app
        .clone()
        .oneshot(webhook(&redemption_body("42", "my vote: 333333")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "ideaId": "1733333333333", "votes": 1, "voterCount": 1 })
    );

    let listed = json_body(app.oneshot(list()).await.unwrap()).await;
    let idea = &listed["ideas"][0];
    assert_eq!(idea["votes"], 1);
    assert_eq!(idea["voters"][0]["userId"], "42");
    assert_eq!(idea["voters"][0]["pointsSpent"], 100);
    assert_eq!(idea["voters"][0]["userInput"], "my vote: 333333");
    assert!(idea["lastVoteAt"].is_string());
}

#[tokio::test]
async fn short_idea_is_rejected_without_storing() {
    let repo = seeded_repo(&[]);
    let mut notifier = MockIdeaNotifier::new();
    notifier.expect_idea_submitted().never();
    let app = app(repo.clone(), Arc::new(notifier));

    let response = app.oneshot(submit("alice", "too short")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Idea must be at least 10 characters" })
    );
    assert!(repo.is_empty());
}

#[tokio::test]
async fn malformed_submission_gets_json_error() {
    let repo = seeded_repo(&[]);
    let app = app(repo.clone(), Arc::new(NoopNotifier));

    let request = Request::builder()
        .method("POST")
        .uri("/api/ideas")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": \"alice\", "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Malformed payload" }));
    assert!(repo.is_empty());
}

#[tokio::test]
async fn blank_username_is_rejected() {
    let repo = seeded_repo(&[]);
    let app = app(repo.clone(), Arc::new(NoopNotifier));

    let response = app
        .oneshot(submit("   ", "a perfectly long idea"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Username is required" })
    );
    assert!(repo.is_empty());
}

#[tokio::test]
async fn failed_notification_still_stores_idea() {
    let repo = seeded_repo(&[]);
    let mut notifier = MockIdeaNotifier::new();
    notifier
        .expect_idea_submitted()
        .times(1)
        .returning(|_| Err(DomainError::Notification("discord down".into())));
    let app = app(repo.clone(), Arc::new(notifier));

    let response = app
        .oneshot(submit("bob", "Speedrun with one hand"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn vote_on_empty_box_is_not_found() {
    let app = app(seeded_repo(&[]), Arc::new(NoopNotifier));

    let response = app
        .oneshot(webhook(&redemption_body("42", "123456")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Idea not found" }));
}
