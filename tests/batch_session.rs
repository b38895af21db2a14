use std::path::Path;

use action_gate::TimingPolicy;
use tokio_util::sync::CancellationToken;
use watchlater_cli::engine::batch_options;
use watchlater_cli::fixture::FaultPoint;
use watchlater_cli::{Config, Engine, SessionSpec, TabBehaviour, TabSpec};
use watchlater_core_types::{ErrorKind, ToggleVia};
use watchlater_scheduler::{
    BatchOptions, Command, CommandOptions, CommandResponse, DetailStatus, NonActionablePolicy,
};

fn fast_config() -> Config {
    Config {
        timing: TimingPolicy::immediate(),
        ..Config::default()
    }
}

fn session(tabs: Vec<TabSpec>) -> SessionSpec {
    SessionSpec {
        tabs,
        fail_enumeration: false,
    }
}

#[tokio::test]
async fn mixed_window_reports_each_tab() {
    let spec = SessionSpec::load(Path::new("tests/fixtures/mixed_session.yaml"))
        .await
        .unwrap();
    let engine = Engine::new(&fast_config(), &spec).unwrap();
    let options = BatchOptions::all().with_non_actionable(NonActionablePolicy::Remove);

    let report = engine.run(options, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.candidate_count, 3);
    assert_eq!(report.processed_count, 2);
    assert_eq!(report.confirmed_count, 1);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.skipped_count, 0);
    assert_eq!(report.closed(), 1);
    assert!(report.is_consistent());

    let statuses: Vec<_> = report.details.iter().map(|d| d.status).collect();
    assert_eq!(
        statuses,
        vec![
            DetailStatus::Added,
            DetailStatus::ClosedNonActionable,
            DetailStatus::Error
        ]
    );
    assert_eq!(report.details[0].via, Some(ToggleVia::PrimaryPath));
    assert_eq!(report.details[0].attempts, Some(1));
    assert_eq!(report.details[2].attempts, Some(7));
    assert_eq!(report.details[2].error_kind, Some(ErrorKind::Unconfirmed));

    let tabs = engine.tabs();
    assert!(tabs[0].saved);
    assert!(tabs[1].removed);
    assert!(!tabs[2].saved);
    assert_eq!(tabs[2].clicks, 7);
    assert!(!tabs[3].removed);
}

#[tokio::test]
async fn missing_player_recovers_after_refreshes() {
    let spec = SessionSpec::load(Path::new("tests/fixtures/recovery_session.json"))
        .await
        .unwrap();
    let engine = Engine::new(&fast_config(), &spec).unwrap();

    let report = engine
        .run(BatchOptions::all(), &CancellationToken::new())
        .await
        .unwrap();

    let recovered = &report.details[0];
    assert_eq!(recovered.status, DetailStatus::Added);
    assert_eq!(recovered.attempts, Some(1));
    assert_eq!(recovered.escalations, Some(3));
    assert_eq!(recovered.via, Some(ToggleVia::DirectPath));

    let gone = &report.details[1];
    assert_eq!(gone.status, DetailStatus::Error);
    assert_eq!(gone.error_kind, Some(ErrorKind::SurfaceUnavailable));
    assert_eq!(gone.escalations, Some(3));
    assert_eq!(gone.via, None);

    let tabs = engine.tabs();
    assert_eq!(tabs[0].refreshes, 3);
    assert_eq!(tabs[1].refreshes, 3);
}

#[tokio::test]
async fn already_saved_tab_is_left_checked() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![TabSpec::new("https://www.youtube.com/watch?v=saved").with_behaviour(
            TabBehaviour {
                already_saved: true,
                ..TabBehaviour::default()
            },
        )]),
    )
    .unwrap();

    let report = engine
        .run(BatchOptions::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.confirmed_count, 1);
    let tabs = engine.tabs();
    assert!(tabs[0].saved);
    assert_eq!(tabs[0].clicks, 0);
}

#[tokio::test]
async fn one_faulty_tab_does_not_stop_the_batch() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![
            TabSpec::new("https://www.youtube.com/watch?v=boom").with_behaviour(TabBehaviour {
                fault: Some(FaultPoint::Toggle),
                ..TabBehaviour::default()
            }),
            TabSpec::new("https://www.youtube.com/shorts/fine").with_behaviour(TabBehaviour {
                transient_opens: 2,
                option_missing: 1,
                stubborn_clicks: 1,
                ..TabBehaviour::default()
            }),
        ]),
    )
    .unwrap();

    let report = engine
        .run(BatchOptions::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.details[0].error_kind, Some(ErrorKind::UnknownException));
    assert_eq!(report.details[1].status, DetailStatus::Added);
    // two unrendered opens, one missing option, one swallowed click
    assert_eq!(report.details[1].attempts, Some(5));
    assert!(report.is_consistent());
}

#[tokio::test]
async fn menu_only_layout_reports_menu_path() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![TabSpec::new("https://m.youtube.com/watch?v=menu")
            .with_behaviour(TabBehaviour {
                paths: vec![ToggleVia::MenuPath],
                ..TabBehaviour::default()
            })]),
    )
    .unwrap();

    let report = engine
        .run(BatchOptions::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.details[0].via, Some(ToggleVia::MenuPath));
}

#[tokio::test]
async fn close_on_success_removes_saved_tabs() {
    let config = fast_config();
    let engine = Engine::new(
        &config,
        &session(vec![
            TabSpec::new("https://www.youtube.com/watch?v=one"),
            TabSpec::new("https://www.youtube.com/watch?v=two"),
        ]),
    )
    .unwrap();
    let options = batch_options(BatchOptions::all(), &config, true, false);

    let report = engine.run(options, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.closed_on_success_count, 2);
    assert!(engine.tabs().iter().all(|t| t.removed && t.saved));
}

#[tokio::test]
async fn command_bridge_answers_run_active() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![
            TabSpec::new("https://www.youtube.com/watch?v=bg"),
            TabSpec {
                active: true,
                ..TabSpec::new("https://www.youtube.com/watch?v=fg")
            },
        ]),
    )
    .unwrap();
    let command = Command::RunActive {
        options: CommandOptions::default(),
    };

    let response = engine.handle(&command, &CancellationToken::new()).await;

    match response {
        CommandResponse::Ok { ok, res } => {
            assert!(ok);
            assert_eq!(res.candidate_count, 1);
            assert_eq!(res.success, 1);
            assert!(res.details[0].address.ends_with("v=fg"));
        }
        other => panic!("unexpected response {:?}", other),
    }
    assert!(!engine.tabs()[0].saved);
}

#[tokio::test]
async fn enumeration_failure_is_reported_not_raised() {
    let engine = Engine::new(
        &fast_config(),
        &SessionSpec {
            tabs: Vec::new(),
            fail_enumeration: true,
        },
    )
    .unwrap();

    let response = engine
        .handle(
            &Command::Run {
                options: CommandOptions::default(),
            },
            &CancellationToken::new(),
        )
        .await;

    assert!(!response.is_ok());
    assert!(engine
        .run(BatchOptions::all(), &CancellationToken::new())
        .await
        .is_err());
}

#[tokio::test]
async fn cancelled_batch_skips_everything() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![
            TabSpec::new("https://www.youtube.com/watch?v=a"),
            TabSpec::new("https://www.youtube.com/"),
        ]),
    )
    .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = engine.run(BatchOptions::all(), &cancel).await.unwrap();

    assert_eq!(report.skipped_count, 2);
    assert!(report
        .details
        .iter()
        .all(|d| d.status == DetailStatus::Cancelled));
    assert!(engine.tabs().iter().all(|t| !t.saved && t.clicks == 0));
}

#[tokio::test]
async fn raw_messages_are_parsed_then_run() {
    let engine = Engine::new(
        &fast_config(),
        &session(vec![TabSpec::new("https://youtu.be/raw1")]),
    )
    .unwrap();
    let cancel = CancellationToken::new();

    let rejected = engine.handle_raw(r#"{"type":"PING"}"#, &cancel).await;
    assert!(!rejected.is_ok());
    assert!(!engine.tabs()[0].saved);

    let accepted = engine.handle_raw(r#"{"type":"RUN"}"#, &cancel).await;
    assert!(accepted.is_ok());
    assert!(engine.tabs()[0].saved);
}

#[test]
fn window_with_two_focused_tabs_is_rejected() {
    let focused = |address: &str| TabSpec {
        active: true,
        ..TabSpec::new(address)
    };
    let result = Engine::new(
        &fast_config(),
        &session(vec![
            focused("https://www.youtube.com/watch?v=one"),
            focused("https://www.youtube.com/watch?v=two"),
        ]),
    );
    assert!(result.is_err());
}
