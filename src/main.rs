use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lpform::client::SolverClient;
use lpform::config::Settings;
use lpform::server;
use lpform::session::Session;

// Usage: lpform [settings.toml]
#[tokio::main]
async fn main() -> lpform::Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = SolverClient::new(&settings.solver)?;
    info!(solver = client.url(), timeout_secs = settings.solver.timeout_secs, "solver configured");
    let session = Arc::new(Session::new(client));
    let app = server::router(session);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind).await?;
    info!(bind = %settings.server.bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
