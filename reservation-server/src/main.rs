use reservation_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(None, config.log_dir.as_deref());

    print_banner();
    tracing::info!(
        environment = %config.environment,
        business_tz = %config.business_tz,
        "Crumb reservation server starting..."
    );

    // 2. State (in-memory reference adapters by default; real deployments
    //    wire their own collaborators through ServerState::new)
    let state = ServerState::with_memory_adapters(&config);

    // 3. Serve (registers background tasks, then blocks until shutdown)
    let server = Server::with_state(config, state);
    server.run().await
}
