use std::sync::Arc;
use tracing::info;

use json_inspect::config::Settings;
use json_inspect::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("json_inspect=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("[Startup] json-inspect {} initializing...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::new()?;
    info!(
        "[Config] Binding at {}:{}",
        settings.server.host, settings.server.port
    );
    info!(
        "[Config] Limits: max_depth={}, max_keys={}, max_file_size={} bytes, extensions={:?}",
        settings.parser.max_depth,
        settings.parser.max_keys,
        settings.parser.max_file_size,
        settings.parser.allowed_extensions
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = Arc::new(AppState::new(settings));
    let app = web::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[Startup] Service ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
