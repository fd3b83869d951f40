use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    poll_button::cli::run().await
}
