use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct HandleArgs {
    /// Command message file; stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Browser session file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

pub async fn cmd_handle(args: HandleArgs, ctx: &CliContext) -> Result<()> {
    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read command {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read command from stdin")?;
            buf
        }
    };

    let engine = ctx.engine(args.session.as_deref()).await?;
    let cancel = ctx.cancellation();
    let response = engine.handle_raw(&raw, &cancel).await;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", rendered);
    Ok(())
}
