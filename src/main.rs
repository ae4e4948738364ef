use pexip_infinity_provider::{init_logging, serve, InfinityProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting pexip-infinity-provider");
    serve(InfinityProvider::new()).await
}
