use clap::{Parser, Subcommand};
use clap_complete::Shell;
use focusrealm_core::storage::LogConfig;
use focusrealm_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusrealm", version, about = "Focus Realm: a gamified Pomodoro timer")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Progress and session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Story chapters
    Story {
        #[command(subcommand)]
        action: commands::story::StoryAction,
    },
    /// Weekly challenge
    Challenge {
        #[command(subcommand)]
        action: commands::challenge::ChallengeAction,
    },
    /// Daily mood check-in
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Record today's gratitude entry
    Gratitude {
        /// What you are grateful for
        text: String,
    },
    /// Pomodoro durations
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Light or dark theme
    Theme {
        #[command(subcommand)]
        action: commands::settings::ThemeAction,
    },
    /// Pet companion
    Pet {
        #[command(subcommand)]
        action: commands::settings::PetAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// `RUST_LOG` wins, then `--verbose`, then the configured filter.
fn init_tracing(verbose: bool) {
    let mut config_error = None;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("focusrealm=debug")
        } else {
            let configured = match Config::load() {
                Ok(config) => config.log.filter,
                Err(e) => {
                    config_error = Some(e);
                    LogConfig::default().filter
                }
            };
            EnvFilter::try_new(&configured).unwrap_or_else(|_| EnvFilter::new("focusrealm=info"))
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Reported only now that a subscriber is listening.
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "falling back to default log filter");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Story { action } => commands::story::run(action),
        Commands::Challenge { action } => commands::challenge::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Gratitude { text } => commands::mood::gratitude(text),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Theme { action } => commands::settings::run_theme(action),
        Commands::Pet { action } => commands::settings::run_pet(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
