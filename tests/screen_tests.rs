use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::yield_now;

use localtime_client::core::error::AppError;
use localtime_client::features::clock::TIMESTAMP_FORMAT;
use localtime_client::features::localtime::{LocalTimeApi, TimeRequest, TimeResponse};
use localtime_client::features::screen::{
    ActionKind, ActionOutcome, INITIAL_STATUS, LocalTimeScreen, ScreenEvent, ScreenState,
};

#[derive(Default)]
struct MockLocalTimeApi {
    fail_submit: bool,
    fail_fetch: bool,
    times: Mutex<Vec<TimeResponse>>,
    submitted: Mutex<Vec<String>>,
    submit_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    submit_gate: Option<Arc<Notify>>,
}

#[async_trait]
impl LocalTimeApi for MockLocalTimeApi {
    async fn submit_time(&self, request: TimeRequest) -> Result<TimeResponse, AppError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.submit_gate {
            gate.notified().await;
        }
        if self.fail_submit {
            return Err(AppError::upstream(
                "request to https://example.invalid/api/localtime failed with 500: boom"
                    .to_string(),
            ));
        }
        self.submitted.lock().push(request.local_time.clone());
        Ok(TimeResponse {
            id: self.submit_calls.load(Ordering::SeqCst) as i64,
            local_time: request.local_time,
        })
    }

    async fn fetch_times(&self) -> Result<Vec<TimeResponse>, AppError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(AppError::upstream(
                "network error contacting https://example.invalid/api/localtime: connection refused"
                    .to_string(),
            ));
        }
        Ok(self.times.lock().clone())
    }
}

fn entry(id: i64, local_time: &str) -> TimeResponse {
    TimeResponse {
        id,
        local_time: local_time.to_string(),
    }
}

#[tokio::test]
async fn send_reports_the_exact_timestamp_sent() {
    let mock = Arc::new(MockLocalTimeApi::default());
    let (screen, _notices) = LocalTimeScreen::new(mock.clone());

    let outcome = screen.send_local_time().await;
    assert_eq!(outcome, ActionOutcome::Completed);

    let sent = mock
        .submitted
        .lock()
        .first()
        .cloned()
        .expect("one submission");
    assert!(
        NaiveDateTime::parse_from_str(&sent, TIMESTAMP_FORMAT).is_ok(),
        "unexpected submitted timestamp {sent:?}"
    );

    let state = screen.snapshot();
    assert_eq!(state.status, format!("Time sent: {sent}"));
    assert!(!state.sending);
}

#[tokio::test]
async fn send_failure_sets_error_status_and_notifies_once() {
    let mock = Arc::new(MockLocalTimeApi {
        fail_submit: true,
        ..Default::default()
    });
    let (screen, mut notices) = LocalTimeScreen::new(mock);

    let outcome = screen.send_local_time().await;
    assert_eq!(outcome, ActionOutcome::Failed);

    let state = screen.snapshot();
    assert!(
        state.status.starts_with("Error: "),
        "status was {:?}",
        state.status
    );
    assert!(!state.sending);

    let notice = notices.try_recv().expect("one notification");
    assert!(notice.starts_with("Error: "));
    assert!(
        notices.try_recv().is_err(),
        "exactly one notification per failure"
    );
}

#[tokio::test]
async fn fetch_replaces_the_list_wholesale() {
    let first = vec![
        entry(1, "2024-03-10 09:15:00"),
        entry(2, "2024-03-10 10:00:00"),
        entry(3, "2024-03-11 00:30:05"),
    ];
    let mock = Arc::new(MockLocalTimeApi {
        times: Mutex::new(first.clone()),
        ..Default::default()
    });
    let (screen, _notices) = LocalTimeScreen::new(mock.clone());

    assert_eq!(screen.fetch_times().await, ActionOutcome::Completed);
    let state = screen.snapshot();
    assert_eq!(state.times, first);
    assert_eq!(state.status, "Fetched 3 times");

    let second = vec![entry(9, "2024-03-12 08:00:00")];
    *mock.times.lock() = second.clone();

    assert_eq!(screen.fetch_times().await, ActionOutcome::Completed);
    let state = screen.snapshot();
    assert_eq!(state.times, second);
    assert_eq!(state.status, "Fetched 1 times");
    assert!(!state.fetching);
}

#[tokio::test]
async fn fetch_failure_sets_error_status_and_notifies_once() {
    let mock = Arc::new(MockLocalTimeApi {
        fail_fetch: true,
        ..Default::default()
    });
    let (screen, mut notices) = LocalTimeScreen::new(mock);

    assert_eq!(screen.fetch_times().await, ActionOutcome::Failed);

    let state = screen.snapshot();
    assert!(state.status.starts_with("Error: "));
    assert!(state.times.is_empty());
    assert!(!state.fetching);

    assert!(notices.try_recv().expect("one notification").starts_with("Error: "));
    assert!(notices.try_recv().is_err());
}

#[tokio::test]
async fn send_is_not_reentrant_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let mock = Arc::new(MockLocalTimeApi {
        submit_gate: Some(gate.clone()),
        ..Default::default()
    });
    let (screen, _notices) = LocalTimeScreen::new(mock.clone());

    let first = tokio::spawn({
        let screen = Arc::clone(&screen);
        async move { screen.send_local_time().await }
    });

    while mock.submit_calls.load(Ordering::SeqCst) == 0 {
        yield_now().await;
    }
    assert!(screen.snapshot().sending);

    assert_eq!(
        screen.send_local_time().await,
        ActionOutcome::AlreadyInFlight
    );
    assert_eq!(
        mock.submit_calls.load(Ordering::SeqCst),
        1,
        "no second request while in flight"
    );

    gate.notify_one();
    assert_eq!(first.await.expect("join"), ActionOutcome::Completed);
    assert!(!screen.snapshot().sending);

    // The guard has cleared, so the action is available again.
    gate.notify_one();
    assert_eq!(screen.send_local_time().await, ActionOutcome::Completed);
    assert_eq!(mock.submit_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn send_and_fetch_guards_are_independent() {
    let gate = Arc::new(Notify::new());
    let mock = Arc::new(MockLocalTimeApi {
        submit_gate: Some(gate.clone()),
        times: Mutex::new(vec![entry(1, "2024-03-10 09:15:00")]),
        ..Default::default()
    });
    let (screen, _notices) = LocalTimeScreen::new(mock.clone());

    let send = tokio::spawn({
        let screen = Arc::clone(&screen);
        async move { screen.send_local_time().await }
    });
    while mock.submit_calls.load(Ordering::SeqCst) == 0 {
        yield_now().await;
    }

    // The fetch proceeds while the send is still waiting on the server.
    assert_eq!(screen.fetch_times().await, ActionOutcome::Completed);
    assert_eq!(screen.snapshot().times.len(), 1);
    assert!(screen.snapshot().sending);

    gate.notify_one();
    assert_eq!(send.await.expect("join"), ActionOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn clock_task_updates_snapshots() {
    let mock = Arc::new(MockLocalTimeApi::default());
    let (screen, _notices) = LocalTimeScreen::new(mock);

    screen.spawn_clock();
    for _ in 0..50 {
        if !screen.snapshot().clock.is_empty() {
            break;
        }
        yield_now().await;
    }
    assert!(!screen.snapshot().clock.is_empty(), "clock never rendered");

    screen.teardown();
    assert!(!screen.snapshot().clock.is_empty());
}

#[test]
fn settling_clears_only_the_matching_flag() {
    let state = ScreenState::default()
        .apply(ScreenEvent::ActionStarted(ActionKind::Send))
        .apply(ScreenEvent::ActionStarted(ActionKind::Fetch));
    assert!(state.sending);
    assert!(state.fetching);
    assert_eq!(state.status, INITIAL_STATUS);

    let state = state.apply(ScreenEvent::ActionSettled(ActionKind::Send));
    assert!(!state.sending);
    assert!(state.fetching);
}

#[test]
fn failure_message_lands_in_the_status_verbatim() {
    let state = ScreenState::default().apply(ScreenEvent::Failed {
        message: "Error: upstream error: boom".to_string(),
    });
    assert_eq!(state.status, "Error: upstream error: boom");
}
