//! Pomodoro durations and the cosmetic preferences stored with progress.

use clap::Subcommand;
use focusrealm_core::timer::SettingsPatch;
use serde_json::json;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show pomodoro durations
    Show,
    /// Change one duration (0 or non-numeric restores the default)
    Set {
        /// work_duration, short_break, long_break or long_break_interval
        field: String,
        /// Minutes (or sessions for long_break_interval)
        value: String,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Switch between light and dark
    Toggle,
}

#[derive(Subcommand)]
pub enum PetAction {
    /// Choose an unlocked pet skin
    Set {
        /// Skin name
        skin: String,
    },
}

pub fn run(action: SettingsAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        SettingsAction::Show => print_json(dash.progression().pomodoro_settings())?,
        SettingsAction::Set { field, value } => {
            let patch = SettingsPatch::parse_field(&field, &value)?;
            print_json(&dash.update_settings(patch))?;
        }
    }
    Ok(())
}

pub fn run_theme(action: ThemeAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        ThemeAction::Toggle => {
            let theme = dash.toggle_theme();
            print_json(&json!({ "theme": theme }))?;
        }
    }
    Ok(())
}

pub fn run_pet(action: PetAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        PetAction::Set { skin } => {
            dash.set_pet_skin(&skin)?;
            print_json(&json!({
                "petSkin": dash.progression().pet_skin(),
                "unlockedSkins": dash.progression().unlocked_skins(),
            }))?;
        }
    }
    Ok(())
}
