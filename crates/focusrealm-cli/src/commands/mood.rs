//! Daily check-in commands: mood and gratitude.

use chrono::Local;
use clap::Subcommand;
use focusrealm_core::progression::{Mood, MoodSlot};
use serde_json::json;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record today's mood
    Set {
        /// morning or evening
        slot: String,
        /// great, good, okay, low or tough
        mood: String,
    },
    /// Show today's check-in
    Show,
}

pub fn run(action: MoodAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        MoodAction::Set { slot, mood } => {
            let slot: MoodSlot = slot.parse()?;
            let mood: Mood = mood.parse()?;
            dash.set_mood(slot, mood);
            print_json(&json!({ "slot": slot, "mood": mood, "emoji": mood.emoji() }))?;
        }
        MoodAction::Show => {
            let today = Local::now().date_naive();
            let progression = dash.progression();
            print_json(&json!({
                "mood": progression.mood_for(today),
                "gratitude": progression.gratitude_entry(),
            }))?;
        }
    }
    Ok(())
}

pub fn gratitude(text: String) -> CmdResult {
    let mut dash = open_dashboard()?;
    dash.set_gratitude(text.trim());
    print_json(&json!({ "gratitude": dash.progression().gratitude_entry() }))
}
