use crate::features::localtime::TimeResponse;

pub const INITIAL_STATUS: &str = "Tap to send local time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Send,
    Fetch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    ClockTick(String),
    ActionStarted(ActionKind),
    ActionSettled(ActionKind),
    TimeSent { timestamp: String },
    TimesFetched { times: Vec<TimeResponse> },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    pub clock: String,
    pub status: String,
    pub sending: bool,
    pub fetching: bool,
    pub times: Vec<TimeResponse>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            clock: String::new(),
            status: INITIAL_STATUS.to_string(),
            sending: false,
            fetching: false,
            times: Vec::new(),
        }
    }
}

impl ScreenState {
    pub fn apply(mut self, event: ScreenEvent) -> Self {
        match event {
            ScreenEvent::ClockTick(rendered) => self.clock = rendered,
            ScreenEvent::ActionStarted(ActionKind::Send) => self.sending = true,
            ScreenEvent::ActionStarted(ActionKind::Fetch) => self.fetching = true,
            ScreenEvent::ActionSettled(ActionKind::Send) => self.sending = false,
            ScreenEvent::ActionSettled(ActionKind::Fetch) => self.fetching = false,
            ScreenEvent::TimeSent { timestamp } => {
                self.status = format!("Time sent: {timestamp}");
            }
            ScreenEvent::TimesFetched { times } => {
                // The fetched list replaces the held one wholesale, no merging.
                self.status = format!("Fetched {} times", times.len());
                self.times = times;
            }
            ScreenEvent::Failed { message } => self.status = message,
        }
        self
    }

    pub fn in_flight(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Send => self.sending,
            ActionKind::Fetch => self.fetching,
        }
    }
}
