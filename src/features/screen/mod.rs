pub mod model;
pub mod state;

pub use model::{ActionOutcome, LocalTimeScreen};
pub use state::{ActionKind, INITIAL_STATUS, ScreenEvent, ScreenState};
