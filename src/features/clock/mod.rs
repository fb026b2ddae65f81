pub mod ticker;

pub use ticker::{
    CLOCK_FORMAT, SCREEN_ZONE, TICK_INTERVAL, TIMESTAMP_FORMAT, clock_ticks, current_timestamp,
    format_clock, format_timestamp,
};
