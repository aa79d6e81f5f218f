use table_server::{Server, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, configuration and logging
    let config = setup_environment();

    tracing::info!("Table server starting...");

    // 2. Open stores and serve until ctrl-c
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
