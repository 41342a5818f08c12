//! Subscription channels against in-process socket servers

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use station_api::models::Identification;
use stationctl::cache::station::StationCache;
use stationctl::notify::messages::Locale;
use stationctl::notify::toast::{ToastFeed, ToastKind};
use stationctl::realtime::channel::{self, channel_url, ChannelExit, ChannelHandler};
use stationctl::realtime::codec::encode_double;
use stationctl::realtime::manager::{ConnectionManager, Options};
use stationctl::realtime::notifications::NotificationHandler;
use stationctl::realtime::state::StateHandler;
use stationctl::storage::session::{Permission, SessionStore};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::WebSocketStream;
use url::Url;

async fn accept(listener: &TcpListener) -> (WebSocketStream<TcpStream>, String) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut path = String::new();
    let ws = tokio_tungstenite::accept_hdr_async(
        stream,
        |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            path = req.uri().path().to_string();
            Ok(resp)
        },
    )
    .await
    .unwrap();
    (ws, path)
}

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> String {
    match ws.next().await {
        Some(Ok(Message::Text(text))) => text.as_str().to_string(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

async fn drain_until_closed(ws: &mut WebSocketStream<TcpStream>) {
    while let Some(Ok(msg)) = ws.next().await {
        if msg.is_close() {
            break;
        }
    }
}

async fn wait_until(cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn local_base() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = Url::parse(&format!("ws://{}/", listener.local_addr().unwrap())).unwrap();
    (listener, base)
}

fn identification() -> Identification {
    Identification {
        cookie: "sid=abc".to_string(),
        workstation: "testworkstation".to_string(),
    }
}

fn frame(value: Value) -> Message {
    Message::Text(encode_double(&value).unwrap().into())
}

#[tokio::test]
async fn test_state_channel_identifies_and_applies_snapshots() {
    let (listener, base) = local_base().await;
    let (hello_tx, hello_rx) = oneshot::channel();

    let server = tokio::spawn(async move {
        let (mut ws, path) = accept(&listener).await;
        let hello = next_text(&mut ws).await;
        hello_tx.send((path, hello)).unwrap();

        ws.send(frame(json!({"currentScenario": "fill", "tanks": {"C1": {"water_level": 4.5}}})))
            .await
            .unwrap();
        ws.send(Message::Text("not json".into())).await.unwrap();
        drain_until_closed(&mut ws).await;
    });

    let station = Arc::new(StationCache::new());
    let feed = ToastFeed::new(10);
    let handler = StateHandler::new(station.clone(), Locale::En);
    let url = channel_url(&base, handler.endpoint()).unwrap();
    let ident = identification();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let watched = station.clone();
    let driver = async move {
        let hello = hello_rx.await.unwrap();
        wait_until(|| watched.current_scenario() == "fill").await;
        stop_tx.send(()).unwrap();
        hello
    };

    let (exit, (path, hello)) = tokio::join!(
        channel::run(
            &url,
            &ident,
            &handler,
            &feed,
            Box::pin(async move {
                let _ = stop_rx.await;
            }),
        ),
        driver
    );

    assert_eq!(exit, ChannelExit::Shutdown);
    assert_eq!(path, "/subscribe/state");
    let hello: Value = serde_json::from_str(&hello).unwrap();
    assert_eq!(hello, json!({"cookie": "sid=abc", "workstation": "testworkstation"}));

    assert_eq!(station.current_scenario(), "fill");
    assert_eq!(station.live_state().unwrap().water_level("C1"), Some(4.5));
    assert!(feed.is_empty());

    tokio::time::timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_connection_failure_toasts_once() {
    let (listener, base) = local_base().await;
    drop(listener);

    let station = Arc::new(StationCache::new());
    let feed = ToastFeed::new(10);
    let handler = StateHandler::new(station, Locale::En);
    let url = channel_url(&base, handler.endpoint()).unwrap();

    let exit = channel::run(&url, &identification(), &handler, &feed, Box::pin(std::future::pending::<()>())).await;

    assert_eq!(exit, ChannelExit::ConnectFailed);
    let toasts = feed.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "Error connecting to state socket");
}

#[tokio::test]
async fn test_server_close_ends_channel_without_toast() {
    let (listener, base) = local_base().await;

    tokio::spawn(async move {
        let (mut ws, _) = accept(&listener).await;
        let _ = next_text(&mut ws).await;
        ws.close(None).await.unwrap();
    });

    let feed = ToastFeed::new(10);
    let handler = StateHandler::new(Arc::new(StationCache::new()), Locale::En);
    let url = channel_url(&base, handler.endpoint()).unwrap();

    let exit = tokio::time::timeout(
        Duration::from_secs(5),
        channel::run(&url, &identification(), &handler, &feed, Box::pin(std::future::pending::<()>())),
    )
    .await
    .unwrap();

    assert_eq!(exit, ChannelExit::Closed);
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_dropped_socket_toasts_once() {
    let (listener, base) = local_base().await;

    let server = tokio::spawn(async move {
        let (mut ws, _) = accept(&listener).await;
        let _ = next_text(&mut ws).await;
        // no close frame
        drop(ws);
    });

    let feed = ToastFeed::new(10);
    let handler = StateHandler::new(Arc::new(StationCache::new()), Locale::En);
    let url = channel_url(&base, handler.endpoint()).unwrap();

    let exit = tokio::time::timeout(
        Duration::from_secs(5),
        channel::run(&url, &identification(), &handler, &feed, Box::pin(std::future::pending::<()>())),
    )
    .await
    .unwrap();
    server.await.unwrap();

    assert_eq!(exit, ChannelExit::Errored);
    let toasts = feed.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "Error connecting to state socket");
}

#[tokio::test]
async fn test_notification_channel_toasts_and_ends_scenario() {
    let (listener, base) = local_base().await;

    let server = tokio::spawn(async move {
        let (mut ws, path) = accept(&listener).await;
        assert_eq!(path, "/subscribe/notifications");
        let _ = next_text(&mut ws).await;

        for message in [
            json!({"task": {"action": "is_open", "target": "V3", "value": 1}, "status": "success"}),
            json!({"task": {"action": "is_on", "target": "P2", "value": 0}, "status": "conditions_not_met"}),
            json!({"task": {"action": "is_on", "target": "P1", "value": 1}, "status": "queued"}),
            json!({"task": {"action": "is_on", "target": "P1", "value": 1}, "status": "connector_error"}),
            json!({"task": {"action": "end_scenario", "target": "", "value": 0}, "status": "success"}),
        ] {
            ws.send(frame(message)).await.unwrap();
        }
        ws.close(None).await.unwrap();
    });

    let station = Arc::new(StationCache::new());
    station.apply_snapshot(serde_json::from_value(json!({"currentScenario": "fill"})).unwrap());
    let feed = Arc::new(ToastFeed::new(10));
    let handler = NotificationHandler::new(station.clone(), feed.clone(), Locale::En);
    let url = channel_url(&base, handler.endpoint()).unwrap();

    let exit = tokio::time::timeout(
        Duration::from_secs(5),
        channel::run(&url, &identification(), &handler, feed.as_ref(), Box::pin(std::future::pending::<()>())),
    )
    .await
    .unwrap();
    server.await.unwrap();

    assert_eq!(exit, ChannelExit::Closed);
    assert_eq!(station.current_scenario(), "");

    let toasts = feed.recent();
    let summary: Vec<(ToastKind, String)> = toasts.into_iter().map(|t| (t.kind, t.message)).collect();
    assert_eq!(
        summary,
        vec![
            (ToastKind::Success, "Open valve V3".to_string()),
            (ToastKind::Warning, "Turn off pump P2".to_string()),
            (ToastKind::Error, "Server could not reach the station".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_manager_opens_both_channels_and_closes() {
    let (listener, base) = local_base().await;
    let (seen_tx, mut seen_rx) = mpsc::channel(2);

    let server = tokio::spawn(async move {
        let mut sockets = Vec::new();
        for _ in 0..2 {
            let (mut ws, path) = accept(&listener).await;
            let hello = next_text(&mut ws).await;
            seen_tx.send((path, hello)).await.unwrap();
            sockets.push(ws);
        }
        for ws in sockets.iter_mut() {
            drain_until_closed(ws).await;
        }
    });

    let session = SessionStore::in_memory(true, Permission::Write, "sid=xyz");
    let station = Arc::new(StationCache::new());
    let feed = Arc::new(ToastFeed::new(10));

    let manager = ConnectionManager::open(&Options::new(base), &session, "ws-7", station, feed.clone(), Locale::En)
        .await
        .unwrap();

    let mut paths = Vec::new();
    for _ in 0..2 {
        let (path, hello) = tokio::time::timeout(Duration::from_secs(5), seen_rx.recv())
            .await
            .unwrap()
            .unwrap();
        let hello: Value = serde_json::from_str(&hello).unwrap();
        assert_eq!(hello, json!({"cookie": "sid=xyz", "workstation": "ws-7"}));
        paths.push(path);
    }
    paths.sort();
    assert_eq!(paths, vec!["/subscribe/notifications", "/subscribe/state"]);

    assert!(manager.is_active());
    manager.close().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    assert!(feed.is_empty());
}
