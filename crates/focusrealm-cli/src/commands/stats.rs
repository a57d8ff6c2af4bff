use clap::Subcommand;
use serde::Serialize;

use focusrealm_core::progression::ProgressSummary;
use focusrealm_core::storage::SessionStats;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Level, XP and session totals
    Show,
    /// Recently completed phases
    Sessions {
        /// Maximum number of sessions
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Serialize)]
struct StatsReport {
    progress: ProgressSummary,
    sessions: SessionStats,
}

pub fn run(action: StatsAction) -> CmdResult {
    let dash = open_dashboard()?;

    match action {
        StatsAction::Show => {
            let report = StatsReport {
                progress: dash.progression().summary(),
                sessions: dash.store().stats()?,
            };
            print_json(&report)?;
        }
        StatsAction::Sessions { limit } => {
            print_json(&dash.store().recent_sessions(limit)?)?;
        }
    }
    Ok(())
}
