use mock_server::{database, seed, ListShape};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let shape = match std::env::var("CINEMAX_LIST_SHAPE") {
        Ok(raw) => ListShape::parse(&raw).unwrap_or_else(|| {
            tracing::warn!("Invalid CINEMAX_LIST_SHAPE value {raw:?}, serving bare arrays");
            ListShape::Bare
        }),
        Err(_) => ListShape::Bare,
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(?shape, "listening on {addr}");
    mock_server::run(listener, database(seed()), shape).await
}
