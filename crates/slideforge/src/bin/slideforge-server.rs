//! Runs a Slideforge server.
//!
//! Environment:
//! - `SLIDEFORGE_BIND`: listen address, default `127.0.0.1:8080`
//! - `RUST_LOG`: tracing filter, default `info`

use slideforge::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), SlideforgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind = std::env::var("SLIDEFORGE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let server = Server::builder().bind(&bind).build().await?;
    server.run().await
}
