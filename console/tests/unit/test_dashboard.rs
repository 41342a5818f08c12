//! Dashboard behaviour against a fake backend

use std::collections::HashMap;
use std::time::Duration;

use station_api::models::TaskRequest;
use stationctl::app::dashboard::View;
use stationctl::cache::station::Mode;
use stationctl::errors::ConsoleError;
use stationctl::models::condition::{ComparisonKind, ScenarioCondition};
use stationctl::models::scenario::{Scenario, Task};
use stationctl::notify::toast::ToastKind;
use stationctl::realtime::manager::Options;
use stationctl::storage::session::Permission;
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};
use url::Url;

use crate::support::{listing, FakeApi, Harness};

fn three_scenarios() -> FakeApi {
    FakeApi::with_listings(vec![
        listing("fill", "Fill the reaction tank"),
        listing("drain", "Drain C5"),
        listing("rinse", ""),
    ])
}

fn live_harness(api: FakeApi) -> Harness {
    let harness = Harness::new(api, Permission::Write);
    harness.dashboard.set_mode(Mode::Live);
    harness
}

#[tokio::test]
async fn test_load_scenarios_numbers_rows() {
    let harness = Harness::new(three_scenarios(), Permission::Write);

    let rows = assert_ok!(harness.dashboard.load_scenarios().await);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].id, 1);
    assert_eq!(rows[1].name, "drain");
    assert_eq!(harness.api.calls(), vec!["LIST sid=test"]);
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn test_unauthorized_list_logs_out() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    *harness.api.list_status.lock().unwrap() = Some(401);

    assert_err!(harness.dashboard.load_scenarios().await);

    assert!(!harness.session.is_logged_in().await);
    assert_eq!(harness.dashboard.snapshot().await.view, View::Login);

    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].header, "Error while listing scenarios");
}

#[tokio::test]
async fn test_client_error_range_logs_out() {
    for status in [403, 404, 499] {
        let harness = Harness::new(three_scenarios(), Permission::Write);
        *harness.api.list_status.lock().unwrap() = Some(status);

        assert_err!(harness.dashboard.load_scenarios().await);
        assert!(!harness.session.is_logged_in().await, "status {}", status);
    }
}

#[tokio::test]
async fn test_other_list_failures_keep_session() {
    for status in [400, 500, 503] {
        let harness = Harness::new(three_scenarios(), Permission::Write);
        *harness.api.list_status.lock().unwrap() = Some(status);

        assert_err!(harness.dashboard.load_scenarios().await);
        assert!(harness.session.is_logged_in().await, "status {}", status);
        assert_eq!(harness.toasts.len(), 1);
    }
}

#[tokio::test]
async fn test_successful_list_never_logs_out() {
    let harness = Harness::new(three_scenarios(), Permission::Read);
    for _ in 0..3 {
        assert_ok!(harness.dashboard.load_scenarios().await);
    }
    assert!(harness.session.is_logged_in().await);
    assert_eq!(harness.dashboard.snapshot().await.view, View::Main);
}

#[tokio::test]
async fn test_delete_removes_only_matching_name() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    assert_ok!(harness.dashboard.load_scenarios().await);

    let removed = assert_ok!(harness.dashboard.delete_scenario("drain").await);
    assert_eq!(removed, 1);
    assert_eq!(harness.names(), vec!["fill", "rinse"]);

    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Success);
    assert_eq!(toasts[0].message, "Scenario: drain");
}

#[tokio::test]
async fn test_delete_unknown_name_still_sends_request() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    assert_ok!(harness.dashboard.load_scenarios().await);

    let removed = assert_ok!(harness.dashboard.delete_scenario("ghost").await);
    assert_eq!(removed, 0);
    assert_eq!(harness.names(), vec!["fill", "drain", "rinse"]);
    assert!(harness.api.calls().contains(&"DELETE ghost sid=test".to_string()));
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    assert_ok!(harness.dashboard.load_scenarios().await);
    *harness.api.delete_status.lock().unwrap() = Some(500);

    assert_err!(harness.dashboard.delete_scenario("fill").await);
    assert_eq!(harness.names(), vec!["fill", "drain", "rinse"]);

    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "fake rejected with 500");
}

#[tokio::test]
async fn test_play_disabled_for_read_permission() {
    let harness = Harness::new(three_scenarios(), Permission::Read);
    harness.dashboard.set_mode(Mode::Live);

    let err = harness.dashboard.play_scenario("fill").await.unwrap_err();
    assert!(matches!(err, ConsoleError::ActionDisabled(_)));
    assert!(harness.api.calls().is_empty());
    assert!(!harness.dashboard.snapshot().await.can_play);
}

#[tokio::test]
async fn test_play_disabled_while_scenario_running() {
    let harness = live_harness(three_scenarios());
    harness
        .station
        .apply_snapshot(serde_json::from_str(r#"{"currentScenario": "drain"}"#).unwrap());

    let err = harness.dashboard.play_scenario("fill").await.unwrap_err();
    assert!(matches!(err, ConsoleError::ActionDisabled(_)));

    harness.station.end_scenario();
    assert_ok!(harness.dashboard.play_scenario("fill").await);
}

#[tokio::test]
async fn test_play_disabled_in_simulation_mode() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    assert_eq!(harness.station.mode(), Mode::Simulation);

    let err = harness.dashboard.play_scenario("fill").await.unwrap_err();
    assert!(matches!(err, ConsoleError::ActionDisabled(_)));
    assert!(harness.api.calls().is_empty());
}

#[tokio::test]
async fn test_play_success_is_silent() {
    let harness = live_harness(three_scenarios());

    assert_ok!(harness.dashboard.play_scenario("fill").await);
    assert_eq!(harness.api.calls(), vec!["PLAY testworkstation/fill sid=test"]);
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn test_play_preconditions_unmet() {
    let harness = live_harness(three_scenarios());
    *harness.api.play_status.lock().unwrap() = Some(400);

    assert_err!(harness.dashboard.play_scenario("fill").await);

    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].header, "Error while running scenario");
    assert_eq!(toasts[0].message, "Initial conditions of the scenario were not met");
}

#[tokio::test]
async fn test_play_other_failure_shows_server_message() {
    let harness = live_harness(three_scenarios());
    *harness.api.play_status.lock().unwrap() = Some(500);

    assert_err!(harness.dashboard.play_scenario("fill").await);
    assert_eq!(harness.toasts.recent()[0].message, "fake rejected with 500");
}

#[tokio::test]
async fn test_delete_confirmed_while_play_in_flight() {
    let api = three_scenarios();
    *api.hold_play.lock().unwrap() = true;
    *api.play_status.lock().unwrap() = Some(400);
    let harness = live_harness(api);
    assert_ok!(harness.dashboard.load_scenarios().await);

    let dashboard = harness.dashboard.clone();
    let play = tokio::spawn(async move { dashboard.play_scenario("fill").await });

    harness.api.play_started.notified().await;
    assert_ok!(harness.dashboard.delete_scenario("fill").await);
    assert_eq!(harness.names(), vec!["drain", "rinse"]);

    harness.api.play_release.notify_one();
    let result = play.await.unwrap();
    assert!(result.is_err());

    // the play outcome never brings the name back
    assert_eq!(harness.names(), vec!["drain", "rinse"]);
}

fn sample_scenario(name: &str) -> Scenario {
    Scenario {
        name: name.to_string(),
        description: "Top up C1".to_string(),
        initial_conditions: ScenarioCondition::all(vec![ScenarioCondition::leaf(
            ComparisonKind::Less,
            "water_level",
            "C1",
            5.0,
        )]),
        tasks: vec![Task {
            action: "is_on".to_string(),
            target: "P1".to_string(),
            value: 1.0,
            ttl: Some(30),
            conditions: None,
        }],
    }
}

#[tokio::test]
async fn test_save_reloads_list() {
    let harness = Harness::new(three_scenarios(), Permission::Write);

    assert_ok!(harness.dashboard.save_scenario(&sample_scenario("top-up")).await);

    assert_eq!(harness.api.calls(), vec!["SAVE top-up sid=test", "LIST sid=test"]);
    assert!(harness.names().contains(&"top-up".to_string()));
    assert_eq!(harness.toasts.recent()[0].header, "Scenario saved");
}

#[tokio::test]
async fn test_invalid_scenario_is_not_sent() {
    let harness = Harness::new(three_scenarios(), Permission::Write);
    let mut scenario = sample_scenario("broken");
    scenario.tasks[0].target.clear();

    let err = harness.dashboard.save_scenario(&scenario).await.unwrap_err();
    assert!(matches!(err, ConsoleError::ValidationError(_)));
    assert!(harness.api.calls().is_empty());
    assert_eq!(harness.toasts.recent()[0].kind, ToastKind::Error);
}

#[tokio::test]
async fn test_fetch_missing_scenario_toasts() {
    let harness = Harness::new(three_scenarios(), Permission::Write);

    assert_err!(harness.dashboard.fetch_scenario("ghost").await);
    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Scenario not found");
}

#[tokio::test]
async fn test_submit_task_returns_status_code() {
    let harness = Harness::new(FakeApi::default(), Permission::Write);
    *harness.api.task_status.lock().unwrap() = Some(409);

    let task = TaskRequest {
        action: "is_on".to_string(),
        target: "V3".to_string(),
        value: 1.0,
    };
    let status = assert_ok!(harness.dashboard.submit_task(&task).await);
    assert_eq!(status, 409);
    assert_eq!(harness.api.calls(), vec!["TASK testworkstation is_on V3 1 sid=test"]);
    assert!(harness.toasts.is_empty());
}

#[tokio::test]
async fn test_snapshot_measurements_follow_mode() {
    let harness = Harness::new(FakeApi::default(), Permission::Write);
    harness
        .dashboard
        .set_simulation_levels(HashMap::from([("C1".to_string(), 3.14159)]));
    harness.station.apply_snapshot(
        serde_json::from_str(r#"{"currentScenario": "", "tanks": {"C2": {"water_level": 7.26}}}"#).unwrap(),
    );

    let snapshot = harness.dashboard.snapshot().await;
    assert_eq!(snapshot.mode, Mode::Simulation);
    assert_eq!(snapshot.measurements[0].height.as_deref(), Some("3.1"));
    assert_eq!(snapshot.measurements[1].height, None);

    harness.dashboard.set_mode(Mode::Live);
    let snapshot = harness.dashboard.snapshot().await;
    assert_eq!(snapshot.measurements[0].height, None);
    assert_eq!(snapshot.measurements[1].height.as_deref(), Some("7.3"));
    assert!(snapshot.can_play);
}

#[tokio::test]
async fn test_logout_switches_view() {
    let harness = Harness::new(FakeApi::default(), Permission::Write);
    assert_ok!(harness.dashboard.logout().await);
    assert_eq!(harness.dashboard.snapshot().await.view, View::Login);

    assert_ok!(harness.dashboard.login("sid=other", Permission::Read).await);
    assert_eq!(harness.dashboard.snapshot().await.view, View::Main);
    assert_eq!(harness.api.calls(), vec!["LIST sid=other"]);
}

async fn wait_for_toasts(harness: &Harness, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while harness.toasts.len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("toasts not pushed in time");
}

#[tokio::test]
async fn test_login_again_reopens_failed_channels() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = Url::parse(&format!("ws://{}/", listener.local_addr().unwrap())).unwrap();
    drop(listener);

    let harness = Harness::with_realtime(FakeApi::default(), Permission::Write, Some(Options::new(base)));

    assert_ok!(harness.dashboard.login("sid=test", Permission::Write).await);
    wait_for_toasts(&harness, 2).await;
    assert!(harness.dashboard.is_mounted().await);

    assert_ok!(harness.dashboard.login("sid=test", Permission::Write).await);
    wait_for_toasts(&harness, 4).await;

    let toasts = harness.toasts.recent();
    assert_eq!(toasts.len(), 4);
    assert!(toasts.iter().all(|t| t.kind == ToastKind::Error));
}
