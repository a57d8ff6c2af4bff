pub mod challenge;
pub mod completions;
pub mod config;
pub mod mood;
pub mod settings;
pub mod stats;
pub mod story;
pub mod task;
pub mod timer;

use focusrealm_core::storage::{Config, Database};
use focusrealm_core::Dashboard;
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk database and restore the dashboard with the current
/// timer configuration.
pub fn open_dashboard() -> Result<Dashboard<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let options = Config::load_or_default().timer_options();
    Ok(Dashboard::load(db, options))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
