use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use quakewatch::clients::{QuakeClient, QuakeSource};
use quakewatch::domain::{QueryParams, Window};
use quakewatch::errors::FetchError;
use quakewatch::services::QuakeSession;
use quakewatch::state::ViewState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct StubState {
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
    mode: Arc<Mutex<Mode>>,
}

#[derive(Clone, Copy, Default)]
enum Mode {
    #[default]
    Populated,
    Empty,
    ServerError,
    Malformed,
}

fn payload(window: &str, items: Value) -> Value {
    let count = items.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "meta": {
            "source": "USGS",
            "count": count,
            "window": window,
            "minMag": 4.5,
            "generated_at": "2024-01-15T10:30:00.000000+00:00"
        },
        "items": items
    })
}

async fn quakes(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let window = params.get("window").cloned().unwrap_or_default();
    state.seen.lock().unwrap().push(params);
    let mode = *state.mode.lock().unwrap();

    match mode {
        Mode::Populated => Json(payload(
            &window,
            json!([
                {
                    "id": "ev1",
                    "mag": 5.4,
                    "place": "42 km NE of Testville",
                    "time": "2024-01-15T09:00:00+00:00",
                    "url": "https://example.org/ev1",
                    "latitude": 38.1,
                    "longitude": 142.3,
                    "depth_km": 12.5,
                    "sig": 449
                },
                {
                    "id": "ev2",
                    "mag": 4.6,
                    "place": null,
                    "time": null,
                    "url": null,
                    "latitude": null,
                    "longitude": null,
                    "depth_km": null,
                    "sig": null
                }
            ]),
        ))
        .into_response(),
        Mode::Empty => Json(payload(&window, json!([]))).into_response(),
        Mode::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response(),
        Mode::Malformed => Json(json!({"items": "nope"})).into_response(),
    }
}

async fn spawn_stub() -> anyhow::Result<(String, StubState)> {
    let state = StubState::default();
    let app = Router::new()
        .route("/quakes", get(quakes))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{}", addr), state))
}

fn client(base: &str) -> QuakeClient {
    QuakeClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_query_params_are_mapped_one_to_one() -> anyhow::Result<()> {
    let (base, stub) = spawn_stub().await?;
    let client = client(&base);

    client
        .fetch_quakes(&QueryParams::new(Window::Week, 6.0, 500))
        .await?;

    let seen = stub.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("window").map(String::as_str), Some("week"));
    assert_eq!(seen[0].get("minMag").map(String::as_str), Some("6"));
    assert_eq!(seen[0].get("limit").map(String::as_str), Some("500"));
    Ok(())
}

#[tokio::test]
async fn test_fields_round_trip_unmodified() -> anyhow::Result<()> {
    let (base, _stub) = spawn_stub().await?;
    let result = client(&base)
        .fetch_quakes(&QueryParams::default())
        .await?;

    assert_eq!(result.meta.window, Window::Day);
    assert_eq!(result.items.len(), 2);
    let first = &result.items[0];
    assert_eq!(first.id, "ev1");
    assert_eq!(first.mag, 5.4);
    assert_eq!(first.place.as_deref(), Some("42 km NE of Testville"));
    assert_eq!(first.time.as_deref(), Some("2024-01-15T09:00:00+00:00"));
    assert_eq!(first.url.as_deref(), Some("https://example.org/ev1"));
    assert_eq!(first.latitude, Some(38.1));
    assert_eq!(first.longitude, Some(142.3));
    assert_eq!(first.depth_km, Some(12.5));
    assert_eq!(first.sig, Some(449));
    assert!(result.items[1].place.is_none());
    Ok(())
}

#[tokio::test]
async fn test_identical_queries_yield_identical_items() -> anyhow::Result<()> {
    let (base, _stub) = spawn_stub().await?;
    let client = client(&base);
    let params = QueryParams::default();

    let a = client.fetch_quakes(&params).await?;
    let b = client.fetch_quakes(&params).await?;
    assert_eq!(a.items, b.items);
    assert_eq!(a.meta.count, b.meta.count);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_network_failure() -> anyhow::Result<()> {
    let (base, stub) = spawn_stub().await?;
    *stub.mode.lock().unwrap() = Mode::ServerError;

    let err = client(&base)
        .fetch_quakes(&QueryParams::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FetchError::NetworkFailure {
            message: "Request failed with status code 500".to_string(),
            status: Some(500),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_decode_failure() -> anyhow::Result<()> {
    let (base, stub) = spawn_stub().await?;
    *stub.mode.lock().unwrap() = Mode::Malformed;

    let err = client(&base)
        .fetch_quakes(&QueryParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DECODE_FAILURE");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_network_failure() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .fetch_quakes(&QueryParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NETWORK_FAILURE");
    assert!(!err.user_message().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_session_empty_result() -> anyhow::Result<()> {
    let (base, stub) = spawn_stub().await?;
    *stub.mode.lock().unwrap() = Mode::Empty;

    let session = QuakeSession::start(
        Arc::new(client(&base)),
        QueryParams::new(Window::Day, 4.5, 50),
    );
    let state = session.settled().await;
    assert_eq!(state.view(), ViewState::Empty);
    Ok(())
}

#[tokio::test]
async fn test_session_server_error_discards_previous_data() -> anyhow::Result<()> {
    let (base, stub) = spawn_stub().await?;
    let mut session = QuakeSession::start(Arc::new(client(&base)), QueryParams::default());

    let state = session.settled().await;
    assert!(matches!(state.view(), ViewState::Populated(_)));
    assert!(session.select_by_id("ev1"));

    *stub.mode.lock().unwrap() = Mode::ServerError;
    session.set_limit(10);

    let state = session.settled().await;
    assert!(state.data.is_none());
    assert!(!state.loading);
    assert_eq!(
        state.view(),
        ViewState::Error("Request failed with status code 500")
    );

    // Selection is independent of the fetch lifecycle
    assert_eq!(
        session.selection().selected().map(|q| q.id.as_str()),
        Some("ev1")
    );
    Ok(())
}
