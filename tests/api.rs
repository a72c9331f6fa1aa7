use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

use cooldown_timer::{
    api::create_router,
    engine::{TimerEngine, TokioScheduler},
    services::{MemoryCue, MemorySurface},
    state::{AppState, Controller, TimerSettings, TimerSnapshot},
    tasks::timer_driver_task,
    utils::SystemClock,
};

fn settings() -> TimerSettings {
    TimerSettings {
        session_ms: 2_000,
        cooldown_ms: 1_000,
        poll_interval: Duration::from_millis(100),
    }
}

/// Spawn a driver with real tokio polls and return a router talking to it
async fn app() -> Router {
    let settings = settings();
    let (poll_tx, poll_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::channel(8);
    let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::new());

    let engine = TimerEngine::new(
        settings.poll_interval,
        Box::new(SystemClock::new()),
        Box::new(TokioScheduler::new(poll_tx)),
    );
    let controller = Controller::new(
        settings,
        engine,
        Box::new(MemorySurface::new()),
        Box::new(MemoryCue::new()),
        Box::new(MemoryCue::new()),
    );
    tokio::spawn(timer_driver_task(controller, poll_rx, command_rx, snapshot_tx));

    let mut booted = snapshot_rx.clone();
    booted
        .wait_for(|snapshot| snapshot.phase.is_some())
        .await
        .expect("driver boots");

    let state = AppState::new(0, "127.0.0.1".to_string(), command_tx, snapshot_rx);
    create_router(Arc::new(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn control(app: &Router) -> Value {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json
}

async fn status(app: &Router) -> Value {
    let request = Request::builder().uri("/status").body(Body::empty()).expect("request");
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json["timer"].clone()
}

#[tokio::test(start_paused = true)]
async fn status_starts_idle() {
    let app = app().await;
    let timer = status(&app).await;

    assert_eq!(timer["phase"], "idle");
    assert_eq!(timer["display"], "0:02");
    assert_eq!(timer["label"], "Start");
    assert_eq!(timer["control_enabled"], true);
    assert_eq!(timer["polling"], false);
}

#[tokio::test(start_paused = true)]
async fn control_runs_pauses_and_resumes() {
    let app = app().await;

    let started = control(&app).await;
    assert_eq!(started["accepted"], true);
    assert_eq!(started["snapshot"]["phase"], "running");

    tokio::time::sleep(Duration::from_millis(550)).await;
    let paused = control(&app).await;
    assert_eq!(paused["snapshot"]["phase"], "paused");
    assert_eq!(paused["snapshot"]["remaining_ms"], 1_500);
    assert_eq!(paused["snapshot"]["marker"], "pause");

    let resumed = control(&app).await;
    assert_eq!(resumed["snapshot"]["phase"], "running");
    assert_eq!(resumed["snapshot"]["remaining_ms"], 1_500);
}

#[tokio::test(start_paused = true)]
async fn alarm_then_cooldown_then_idle() {
    let app = app().await;
    control(&app).await;

    tokio::time::sleep(Duration::from_millis(2_050)).await;
    let timer = status(&app).await;
    assert_eq!(timer["phase"], "alarm");
    assert_eq!(timer["display"], "0:00");
    assert_eq!(timer["alarm_playing"], true);

    let cooldown = control(&app).await;
    assert_eq!(cooldown["snapshot"]["phase"], "cooldown");
    assert_eq!(cooldown["snapshot"]["alarm_playing"], false);
    assert_eq!(cooldown["snapshot"]["cooldown_playing"], true);
    assert_eq!(cooldown["snapshot"]["control_enabled"], false);

    let ignored = control(&app).await;
    assert_eq!(ignored["accepted"], false);

    tokio::time::sleep(Duration::from_millis(1_050)).await;
    let timer = status(&app).await;
    assert_eq!(timer["phase"], "idle");
    assert_eq!(timer["remaining_ms"], 2_000);
    assert_eq!(timer["control_enabled"], true);
}

#[tokio::test(start_paused = true)]
async fn repeated_key_press_is_ignored() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"source":"key","repeat":true}"#))
        .expect("request");

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["accepted"], false);
    assert_eq!(json["snapshot"]["phase"], "idle");
}

#[tokio::test(start_paused = true)]
async fn health_reports_ok() {
    let app = app().await;
    let request = Request::builder().uri("/health").body(Body::empty()).expect("request");
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn body_without_json_content_type_is_rejected() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .body(Body::from(r#"{"source":"key","repeat":true}"#))
        .expect("request");

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(status_of(&app).await, "idle");
}

#[tokio::test(start_paused = true)]
async fn unknown_source_is_rejected() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"source":"keyboard","repeat":true}"#))
        .expect("request");

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(status_of(&app).await, "idle");
}

#[tokio::test(start_paused = true)]
async fn malformed_json_is_rejected() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(status_of(&app).await, "idle");
}

#[tokio::test(start_paused = true)]
async fn json_pointer_press_is_accepted() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/control")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"source":"pointer"}"#))
        .expect("request");

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["accepted"], true);
    assert_eq!(json["snapshot"]["phase"], "running");
}

async fn status_of(app: &Router) -> Value {
    status(app).await["phase"].clone()
}
