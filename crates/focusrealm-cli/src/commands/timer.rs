use std::time::Duration;

use clap::Subcommand;
use focusrealm_core::storage::Database;
use focusrealm_core::timer::{Clock, SystemClock, TimerState};
use focusrealm_core::{Dashboard, Event, StateStore};
use tracing::info;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start the countdown (after the breathing interval)
    Start,
    /// Pause the countdown
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Rewind the current phase
    Reset,
    /// Advance the timer by whole seconds without waiting
    Tick {
        /// Number of seconds
        #[arg(default_value = "1")]
        secs: u64,
    },
    /// Run the timer in the foreground until the phase ends or Ctrl-C
    Run,
}

fn print_events(events: &[Event]) -> CmdResult {
    for event in events {
        print_json(event)?;
    }
    Ok(())
}

/// What a catch-up command has to report, in print order.
struct CatchUp {
    /// Events from time that passed since the last command.
    elapsed: Vec<Event>,
    /// The command's own result.
    result: Option<Event>,
    /// Events from the pump that anchors the driver after the command.
    anchored: Vec<Event>,
}

/// Apply elapsed time, run `op`, then anchor the driver on the resulting
/// generation.
fn catch_up<S: StateStore, C: Clock + ?Sized>(
    dash: &mut Dashboard<S>,
    clock: &C,
    op: impl FnOnce(&mut Dashboard<S>) -> Option<Event>,
) -> CatchUp {
    let elapsed = dash.pump(clock);
    let result = op(dash);
    let anchored = dash.pump(clock);
    CatchUp {
        elapsed,
        result,
        anchored,
    }
}

fn with_catch_up(
    dash: &mut Dashboard<Database>,
    op: impl FnOnce(&mut Dashboard<Database>) -> Option<Event>,
) -> CmdResult {
    let report = catch_up(dash, &SystemClock, op);
    print_events(&report.elapsed)?;
    match report.result {
        Some(event) => print_json(&event)?,
        None => print_json(&dash.timer().snapshot())?,
    }
    print_events(&report.anchored)
}

pub fn run(action: TimerAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        TimerAction::Status => {
            print_events(&dash.pump(&SystemClock))?;
            print_json(&dash.timer().snapshot())?;
        }
        TimerAction::Start => with_catch_up(&mut dash, Dashboard::start)?,
        TimerAction::Pause => with_catch_up(&mut dash, Dashboard::pause)?,
        TimerAction::Toggle => with_catch_up(&mut dash, Dashboard::toggle)?,
        TimerAction::Reset => with_catch_up(&mut dash, Dashboard::reset)?,
        TimerAction::Tick { secs } => {
            print_events(&dash.tick(secs))?;
            print_json(&dash.timer().snapshot())?;
        }
        TimerAction::Run => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_foreground(&mut dash))?;
        }
    }
    Ok(())
}

async fn run_foreground(dash: &mut Dashboard<Database>) -> CmdResult {
    dash.pump(&SystemClock);
    if matches!(dash.timer().state(), TimerState::Idle | TimerState::Paused) {
        if let Some(event) = dash.start() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in dash.pump(&SystemClock) {
                    println!("{}", serde_json::to_string(&event)?);
                }
                if dash.timer().state() == TimerState::Idle {
                    break;
                }
                eprint!("\r{} {} ", dash.timer().phase().label(), dash.timer().format_remaining());
            }
            _ = &mut ctrl_c => {
                info!("interrupted; timer keeps its state");
                break;
            }
        }
    }
    eprintln!();
    print_json(&dash.timer().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusrealm_core::progression::ProgressionStore;
    use focusrealm_core::storage::STATE_KEY;
    use focusrealm_core::timer::{ManualClock, TimerOptions};
    use focusrealm_core::{MemoryStore, Phase};

    fn one_minute_dashboard() -> Dashboard<MemoryStore> {
        let store = MemoryStore::new();
        store
            .set(
                STATE_KEY,
                r#"{"pomodoroSettings": {"workDuration": 1, "shortBreak": 1, "longBreak": 1, "longBreakInterval": 4}}"#,
            )
            .unwrap();
        let options = TimerOptions {
            prep_delay_secs: 0,
            ..TimerOptions::default()
        };
        Dashboard::load(store, options)
    }

    #[test]
    fn reports_events_from_the_anchoring_pump() {
        let clock = ManualClock::new(0);
        let mut dash = one_minute_dashboard();
        dash.start();
        dash.pump(&clock);

        // The phase runs out while the command is being handled.
        let report = catch_up(&mut dash, &clock, |d| {
            clock.advance(std::time::Duration::from_secs(60));
            d.start()
        });

        assert!(report.elapsed.is_empty());
        assert!(report.result.is_none());
        assert!(report.anchored.iter().any(|e| matches!(
            e,
            Event::PhaseCompleted {
                completed: Phase::Work,
                ..
            }
        )));
        assert_eq!(dash.progression().total_pomodoros(), 1);
    }

    #[test]
    fn elapsed_events_come_before_the_command() {
        let clock = ManualClock::new(0);
        let mut dash = one_minute_dashboard();
        dash.start();
        dash.pump(&clock);
        clock.advance(std::time::Duration::from_secs(60));

        let report = catch_up(&mut dash, &clock, Dashboard::start);

        assert!(report
            .elapsed
            .iter()
            .any(|e| matches!(e, Event::PhaseCompleted { .. })));
        assert!(matches!(report.result, Some(Event::TimerStarted { .. })));
        assert!(report.anchored.is_empty());
        assert_eq!(dash.timer().phase(), Phase::ShortBreak);
        assert_eq!(
            ProgressionStore::from_json(&dash.store().get(STATE_KEY).unwrap().unwrap())
                .unwrap()
                .xp(),
            25
        );
    }
}
