#[tokio::main]
async fn main() -> mentionrelay::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("mentionrelay=info,serenity=warn"),
    )
    .init();
    log::info!("Starting mentionrelay Discord bot");

    match mentionrelay::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
