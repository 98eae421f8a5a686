use task_manager_rust::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    task_manager_rust::init_logging();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} mode={:?}",
        config.server.host,
        config.server.port,
        config.mode
    );

    task_manager_rust::start(config).await
}
