/**
 * License Inventory Server Entry Point
 *
 * Loads configuration, initializes tracing, opens the database and serves
 * the inventory API.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use license_inventory::backend::server::{create_app, ServerConfig};

    let config = ServerConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!("Server initialization started");

    let app = create_app(&config).await?;

    let addr = config.socket_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Client should connect to http://127.0.0.1:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin license-server --features ssr");
    std::process::exit(1);
}
