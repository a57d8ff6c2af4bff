//! Time sources and the tick driver.
//!
//! [`SessionTimer`] only understands "one more second". The [`TimerDriver`]
//! turns readings from a [`Clock`] into whole-second ticks, so production
//! code runs on [`SystemClock`] while tests advance a [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{SessionTimer, TickToken, TimerState};
use crate::events::Event;

/// Millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock (milliseconds since the Unix epoch).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Virtual clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Anchor {
    token: TickToken,
    at_ms: u64,
}

/// Converts elapsed clock time into timer ticks.
///
/// The driver remembers the instant it last accounted for, together with
/// the timer generation that instant belongs to. When the generation
/// changes (start, pause, reset, phase stop) it re-anchors instead of
/// replaying time against the new generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerDriver {
    #[serde(default)]
    anchor: Option<Anchor>,
}

impl TimerDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every whole second elapsed since the last pump.
    ///
    /// Sub-second remainders are carried over to the next call.
    pub fn pump<C: Clock + ?Sized>(&mut self, timer: &mut SessionTimer, clock: &C) -> Vec<Event> {
        let now = clock.now_ms();
        if !is_active(timer) {
            self.anchor = None;
            return Vec::new();
        }

        let anchor = match self.anchor {
            Some(anchor) if anchor.token == timer.token() => anchor,
            _ => {
                debug!(at_ms = now, "driver anchored");
                self.anchor = Some(Anchor {
                    token: timer.token(),
                    at_ms: now,
                });
                return Vec::new();
            }
        };

        let whole_secs = now.saturating_sub(anchor.at_ms) / 1000;
        let mut events = Vec::new();
        let mut consumed = 0;
        while consumed < whole_secs {
            if timer.token() != anchor.token || !is_active(timer) {
                break;
            }
            if let Some(event) = timer.tick_with(anchor.token) {
                events.push(event);
            }
            consumed += 1;
        }

        self.anchor = if is_active(timer) {
            Some(Anchor {
                token: timer.token(),
                at_ms: anchor.at_ms + consumed * 1000,
            })
        } else {
            None
        };
        events
    }

    /// Forget the anchor; the next pump starts counting from scratch.
    pub fn clear(&mut self) {
        self.anchor = None;
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}

fn is_active(timer: &SessionTimer) -> bool {
    matches!(timer.state(), TimerState::Preparing | TimerState::Running)
}
