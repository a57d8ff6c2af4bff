use clap::CommandFactory;
use clap_complete::{generate, Shell};

use super::CmdResult;
use crate::Cli;

/// Write a completion script for `shell` to stdout.
pub fn run(shell: Shell) -> CmdResult {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "focusrealm", &mut std::io::stdout());
    Ok(())
}
