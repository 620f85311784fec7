//! NSE API Server Binary
//!
//! Run with: `cargo run --bin nse-server`

use nse_api::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is initialized in run_server(); RUST_LOG controls the level:
    //   RUST_LOG=debug cargo run --bin nse-server
    //   RUST_LOG=nse_api::archive=debug cargo run --bin nse-server
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    println!("Starting NSE API Server...");
    println!("   PORT: {:?}", std::env::var("PORT").ok());
    println!("   Mode: {}", config.fetch.mode);
    println!();
    println!(
        "Server will be available at: http://{}:{}",
        config.host, config.port
    );
    println!();
    println!("Available endpoints:");
    println!("  GET  /                    - Usage");
    println!("  GET  /health              - Health check");
    println!("  GET  /test-connection     - Probe upstream connectivity");
    println!("  GET  /nse?date=DDMMYYYY   - Fetch participant open interest CSV");
    println!();

    run_server(config).await?;

    Ok(())
}
