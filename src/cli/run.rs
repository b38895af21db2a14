use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;
use watchlater_scheduler::{metrics, BatchOptions};

use crate::cli::context::CliContext;
use crate::cli::output::{print_structured, OutputFormat};
use crate::engine::batch_options;
use crate::render::render_report;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Browser session file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Close each tab once its save is confirmed
    #[arg(long)]
    pub close_on_success: bool,

    /// Close candidate tabs that are not video pages
    #[arg(long)]
    pub close_non_actionable: bool,
}

pub async fn cmd_run(
    args: RunArgs,
    base: BatchOptions,
    ctx: &CliContext,
    output: &OutputFormat,
) -> Result<()> {
    let engine = ctx.engine(args.session.as_deref()).await?;
    let options = batch_options(
        base,
        ctx.config(),
        args.close_on_success,
        args.close_non_actionable,
    );
    let cancel = ctx.cancellation();

    let report = engine.run(options, &cancel).await?;

    match output {
        OutputFormat::Human => println!("{}", render_report(&report)),
        format => print_structured(&report, format)?,
    }

    let counters = metrics::snapshot();
    info!(
        processed = counters.processed,
        confirmed = counters.confirmed,
        errors = counters.errors,
        escalations = counters.escalations,
        removals = counters.removals,
        "Run counters"
    );
    Ok(())
}
