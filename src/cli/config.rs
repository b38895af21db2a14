use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use watchlater_scheduler::BatchSettings;

use crate::cli::context::CliContext;
use crate::cli::output::{print_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show effective configuration (default)
    Show,

    /// Validate configuration
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext, output: &OutputFormat) -> Result<()> {
    let config = ctx.config();
    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => match output {
            OutputFormat::Human => {
                println!("# Effective configuration ({})", ctx.config_path().display());
                print!("{}", serde_yaml::to_string(config)?);
            }
            format => print_structured(config, format)?,
        },
        ConfigAction::Validate => {
            config
                .timing
                .validate()
                .context("timing section is invalid")?;
            BatchSettings::new(config.timing.clone())?
                .with_domain_filter(&config.domain_filter)
                .context("domain_filter is not a valid regex")?;
            if config.option_label.trim().is_empty() {
                anyhow::bail!("option_label must not be empty");
            }
            println!("Configuration {} is valid", ctx.config_path().display());
        }
    }
    Ok(())
}
