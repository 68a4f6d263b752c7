use axum::{
    body::Body,
    http::{HeaderMap, Request},
    response::Response,
};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use shared_types::{AppError, FeatureFlags};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header the case data store sets on callbacks with the triggering event.
pub const CCD_EVENT_HEADER: &str = "x-ccd-event-id";

/// Keep the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

fn tls_config() -> opentelemetry_otlp::tonic_types::transport::ClientTlsConfig {
    opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots()
}

fn otlp_error(what: &str) -> impl Fn(opentelemetry_otlp::ExporterBuildError) -> AppError + '_ {
    move |e| AppError::internal(format!("Failed to create OTLP {what} exporter: {e}"))
}

/// Set up the OTLP trace exporter and the `log` bridge.
///
/// Does nothing unless the `telemetry` flag is on and
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set. Must be called inside a Tokio
/// runtime. Reads `OTEL_SERVICE_NAME` (default `nfdiv-case-api`) and
/// `DEPLOY_ENV` (default `development`).
pub fn init_telemetry(flags: &FeatureFlags) -> Result<(), AppError> {
    if !flags.telemetry {
        tracing::info!("Telemetry disabled");
        return Ok(());
    }

    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        tracing::warn!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return Ok(());
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "nfdiv-case-api".to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());
    let secure = endpoint.starts_with("https://");

    let mut span_builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if secure {
        span_builder = span_builder.with_tls_config(tls_config());
    }
    let exporter = span_builder.build().map_err(otlp_error("span"))?;

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(provider);

    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint);
    if secure {
        log_builder = log_builder.with_tls_config(tls_config());
    }
    let log_exporter = log_builder.build().map_err(otlp_error("log"))?;

    let logger_provider = LOGGER_PROVIDER.get_or_init(|| {
        opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build()
    });

    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(logger_provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("Log bridge skipped, a logger is already set"),
    }

    tracing::info!(endpoint = %endpoint, version = APP_VERSION, "Telemetry initialized");
    Ok(())
}

/// Span attributes taken from the request headers.
fn header_attributes(headers: &HeaderMap) -> Vec<KeyValue> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut attributes = vec![KeyValue::new(
        "http.request_id",
        header("x-request-id").unwrap_or_default(),
    )];
    if let Some(event_id) = header(CCD_EVENT_HEADER) {
        attributes.push(KeyValue::new("ccd.event_id", event_id));
    }
    attributes.push(KeyValue::new(
        "auth.service_token",
        headers.contains_key("serviceauthorization"),
    ));
    attributes
}

/// Tower layer that creates an OpenTelemetry server span for each request.
///
/// Captures: method, path, request ID, the triggering case event when the
/// case data store sends one, and the response status.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer("nfdiv-case-api");
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path.clone()),
        ];
        attributes.extend(header_attributes(req.headers()));

        let span = tracer
            .span_builder(format!("{method} {path}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}
