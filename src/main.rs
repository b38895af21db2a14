use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    watchlater_cli::cli::app::run().await
}
