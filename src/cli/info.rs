use anyhow::Result;

use crate::cli::context::CliContext;

pub async fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();

    println!("WatchLater System Information");
    println!("=============================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("BUILD_DATE"));
    println!("Git Commit: {}", env!("GIT_HASH"));
    println!("Git Branch: {}", env!("GIT_BRANCH"));
    println!();

    println!("Configuration:");
    println!(
        "- Source: {}{}",
        ctx.config_path().display(),
        if ctx.config_from_file() {
            ""
        } else {
            " (not found, defaults)"
        }
    );
    println!("- Domain Filter: {}", config.domain_filter);
    println!("- Option Label: {}", config.option_label);
    println!(
        "- Attempts: {} per pass, {} refresh escalation(s)",
        config.timing.max_attempts, config.timing.max_escalations
    );
    match &config.session {
        Some(path) => println!("- Session: {}", path.display()),
        None => println!("- Session: (none)"),
    }

    Ok(())
}
