use dataup_api::setup;
use dataup_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dataup_api::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, registry, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
