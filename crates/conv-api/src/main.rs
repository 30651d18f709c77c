//! Convention API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p conv-api
//! ```
//!
//! Configuration is loaded from environment variables; a `.env` file is read
//! first when present.

use conv_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Configuration picks the log format, so load it before tracing
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.api.address(),
        "Starting convention API server"
    );

    if let Err(e) = conv_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
