mod clock;
mod engine;
mod phase;

pub use clock::{Clock, ManualClock, SystemClock, TimerDriver};
pub use engine::{SessionTimer, TickToken, TimerOptions, TimerState, DEFAULT_PREP_DELAY_SECS};
pub use phase::{
    Phase, PomodoroSettings, SettingsPatch, DEFAULT_LONG_BREAK_INTERVAL, DEFAULT_LONG_BREAK_MIN,
    DEFAULT_SHORT_BREAK_MIN, DEFAULT_WORK_MIN, MAX_LONG_BREAK_INTERVAL, MAX_LONG_BREAK_MIN,
    MAX_SHORT_BREAK_MIN, MAX_WORK_MIN,
};
