use clap::Subcommand;
use serde_json::json;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Show this week's challenge
    Show,
}

pub fn run(action: ChallengeAction) -> CmdResult {
    let dash = open_dashboard()?;

    match action {
        ChallengeAction::Show => {
            let challenge = dash.progression().weekly_challenge();
            print_json(&json!({
                "challenge": challenge,
                "progressPct": challenge.progress_pct(),
            }))?;
        }
    }
    Ok(())
}
