use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::time::{self, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

// The screen always renders Kuala Lumpur time, whatever the host zone is.
pub const SCREEN_ZONE: Tz = chrono_tz::Asia::Kuala_Lumpur;
pub const CLOCK_FORMAT: &str = "%H:%M:%S";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub fn format_clock(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&SCREEN_ZONE)
        .format(CLOCK_FORMAT)
        .to_string()
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&SCREEN_ZONE)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

pub fn current_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn clock_ticks() -> impl Stream<Item = String> + Unpin {
    let mut interval = time::interval(TICK_INTERVAL);
    // A stalled runtime should not burst a backlog of clock updates.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    IntervalStream::new(interval).map(|_| format_clock(Utc::now()))
}
