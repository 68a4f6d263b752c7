use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use server::app::Application;
use server::config::{self, GatewayConfig};
use server::telemetry::{self, OtelTraceLayer};
use server::{health, openapi, tasks};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
    cancel.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_logging();
    config::load_config();
    health::record_start_time();

    let flags = config::feature_flags();
    telemetry::init_telemetry(flags)?;

    let gateway_config = GatewayConfig::from_env()?;
    let app = Application::from_config(&gateway_config)?;

    let cancel = CancellationToken::new();
    let handles = tasks::spawn_all(
        tasks::scheduled_tasks(&app.task_deps, config::task_settings()),
        flags,
        cancel.clone(),
    );

    let router = openapi::api_router(app.state)
        .layer(OtelTraceLayer)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Case API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    for handle in handles {
        let _ = handle.await;
    }
    Ok(())
}
