use super::config::cmd_config;
use super::env::CliArgs;
use super::handle::cmd_handle;
use super::info::cmd_info;
use super::run::cmd_run;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;
use watchlater_scheduler::BatchOptions;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, BatchOptions::all(), ctx, &cli.output).await,
        Commands::RunActive(args) => {
            cmd_run(args, BatchOptions::active(), ctx, &cli.output).await
        }
        Commands::Handle(args) => cmd_handle(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx, &cli.output).await,
        Commands::Info => cmd_info(ctx).await,
    }
}
