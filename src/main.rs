use gatepass::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment first (dotenv), then logging
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let logs_dir = config.logs_dir();
    gatepass::init_logger_with_file(None, logs_dir.to_str());

    print_banner();
    tracing::info!("Gatepass server starting...");

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
