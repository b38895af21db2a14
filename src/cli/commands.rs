use clap::Subcommand;

use super::config::ConfigArgs;
use super::handle::HandleArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Save every candidate tab to Watch Later
    Run(RunArgs),

    /// Save only the active tab
    RunActive(RunArgs),

    /// Answer one JSON command message (RUN / RUN_ACTIVE)
    Handle(HandleArgs),

    /// Show or validate the effective configuration
    Config(ConfigArgs),

    /// Show version and build information
    Info,
}
