use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;

use crate::features::clock::{clock_ticks, current_timestamp};
use crate::features::localtime::{LocalTimeApi, TimeRequest};
use crate::features::screen::state::{ActionKind, ScreenEvent, ScreenState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed,
    AlreadyInFlight,
}

pub struct LocalTimeScreen {
    api: Arc<dyn LocalTimeApi>,
    state: Arc<RwLock<ScreenState>>,
    notices: mpsc::UnboundedSender<String>,
    tasks: Mutex<JoinSet<()>>,
}

impl LocalTimeScreen {
    pub fn new(api: Arc<dyn LocalTimeApi>) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let screen = Arc::new(Self {
            api,
            state: Arc::new(RwLock::new(ScreenState::default())),
            notices,
            tasks: Mutex::new(JoinSet::new()),
        });
        (screen, receiver)
    }

    pub fn snapshot(&self) -> ScreenState {
        self.state.read().clone()
    }

    pub async fn send_local_time(&self) -> ActionOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.state, ActionKind::Send) else {
            tracing::debug!("send already in flight, ignoring");
            return ActionOutcome::AlreadyInFlight;
        };

        let timestamp = current_timestamp();
        tracing::info!(%timestamp, "sending local time");

        let request = TimeRequest {
            local_time: timestamp.clone(),
        };
        match self.api.submit_time(request).await {
            Ok(response) => {
                tracing::info!(id = response.id, "time sent");
                self.apply(ScreenEvent::TimeSent { timestamp });
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to send local time");
                self.fail(err.to_string());
                ActionOutcome::Failed
            }
        }
    }

    pub async fn fetch_times(&self) -> ActionOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.state, ActionKind::Fetch) else {
            tracing::debug!("fetch already in flight, ignoring");
            return ActionOutcome::AlreadyInFlight;
        };

        match self.api.fetch_times().await {
            Ok(times) => {
                tracing::info!(count = times.len(), "times fetched");
                self.apply(ScreenEvent::TimesFetched { times });
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch times");
                self.fail(err.to_string());
                ActionOutcome::Failed
            }
        }
    }

    pub fn spawn_clock(self: &Arc<Self>) {
        let screen = Arc::clone(self);
        self.spawn_scoped(async move {
            let mut ticks = clock_ticks();
            while let Some(rendered) = ticks.next().await {
                screen.apply(ScreenEvent::ClockTick(rendered));
            }
        });
    }

    pub fn spawn_send(self: &Arc<Self>) {
        let screen = Arc::clone(self);
        self.spawn_scoped(async move {
            screen.send_local_time().await;
        });
    }

    pub fn spawn_fetch(self: &Arc<Self>) {
        let screen = Arc::clone(self);
        self.spawn_scoped(async move {
            screen.fetch_times().await;
        });
    }

    pub fn teardown(&self) {
        self.tasks.lock().abort_all();
    }

    fn spawn_scoped<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        // Reap settled tasks so the set does not grow with every action.
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    fn apply(&self, event: ScreenEvent) {
        let mut state = self.state.write();
        let next = state.clone().apply(event);
        *state = next;
    }

    fn fail(&self, description: String) {
        let message = format!("Error: {description}");
        self.apply(ScreenEvent::Failed {
            message: message.clone(),
        });
        // One transient notification per failure; a vanished presentation is not an error.
        let _ = self.notices.send(message);
    }
}

struct InFlightGuard {
    state: Arc<RwLock<ScreenState>>,
    action: ActionKind,
}

impl InFlightGuard {
    fn acquire(state: &Arc<RwLock<ScreenState>>, action: ActionKind) -> Option<Self> {
        let mut guard = state.write();
        if guard.in_flight(action) {
            return None;
        }
        let next = guard.clone().apply(ScreenEvent::ActionStarted(action));
        *guard = next;
        Some(Self {
            state: Arc::clone(state),
            action,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // Clears the flag on every exit path, including an aborted task.
        let mut guard = self.state.write();
        let next = guard.clone().apply(ScreenEvent::ActionSettled(self.action));
        *guard = next;
    }
}
