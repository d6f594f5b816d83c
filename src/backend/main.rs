/**
 * Party Trailer Server Entry Point
 *
 * Loads `.env`, validates configuration, initializes tracing and serves the
 * Axum application.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use partytrailer::backend::server::create_app;
    use partytrailer::shared::AppConfig;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,partytrailer=debug,tower_http=debug".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[STARTUP] Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("[STARTUP] Configuration loaded: {:?}", config.booqable);

    let port = config.port;
    let app = match create_app(config).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("[STARTUP] {}", e);
            std::process::exit(1);
        }
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin partytrailer-server --features ssr");
    std::process::exit(1);
}
