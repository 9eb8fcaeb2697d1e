use std::{
    future::IntoFuture as _,
    io,
    net::SocketAddr,
    sync::OnceLock,
    time,
};

use application::{config::LogFormat, router, Args, Config, Service};
use axum::extract::MatchedPath;
use axum_client_ip::InsecureClientIp;
use futures::{future, FutureExt as _};
use service::infra::{Postgres, Storage};
use tokio::{net::TcpListener, signal};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

static LOG_FORMAT: OnceLock<LogFormat> = OnceLock::new();

/// Checks whether an event of the provided `meta`data should be written to
/// the stderr (or stdout) writer of the provided [`LogFormat`].
fn is_enabled(
    meta: &log::Metadata<'_>,
    stderr: bool,
    format: LogFormat,
) -> bool {
    if LOG_FORMAT.get().copied().unwrap_or_default() != format {
        return false;
    }
    meta.is_span()
        || (STDERR_LEVELS.contains(meta.level()) == stderr)
            && LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                >= *meta.level()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    is_enabled(meta, false, LogFormat::Compact)
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    is_enabled(meta, true, LogFormat::Compact)
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    is_enabled(meta, false, LogFormat::Json)
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    is_enabled(meta, true, LogFormat::Json)
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));
    LOG_FORMAT
        .set(log.format)
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let postgres = Postgres::new(&postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;

    let service = Service::new(service.into(), Storage::from(postgres));

    let app = router(service)
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            server.request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|r: &http::Request<_>| {
                    tracing::info_span!(
                        "HTTP request",
                        http.client_ip = InsecureClientIp::from(
                            r.headers(),
                            r.extensions()
                        )
                            .map(|ip| ip.0.to_string())
                            .ok(),
                        http.flavor = ?r.version(),
                        http.method = r.method().as_str(),
                        http.route = r
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.target = r
                            .uri()
                            .path_and_query()
                            .map(http::uri::PathAndQuery::as_str),
                        http.user_agent = r
                            .headers()
                            .get("User-Agent")
                            .and_then(|h| h.to_str().ok()),
                        http.status_code = tracing::field::Empty,
                    )
                })
                .on_response(
                    |r: &http::Response<_>,
                     dur: time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(r.status().as_u16()),
                        );

                        if r.status().is_server_error() {
                            tracing::error!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        } else {
                            tracing::info!(
                                duration = format!("{}ms", dur.as_millis()),
                            );
                        }
                    },
                ),
        );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    let shutdown = shutdown_signal().shared();
    let serve = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone());

    let drain_timeout = server.shutdown_timeout;
    let deadline = shutdown.then(|()| tokio::time::sleep(drain_timeout));

    tokio::select! {
        res = serve.into_future() => {
            res.map_err(|e| log::error!("webserver failed: {e}"))
        }
        () = deadline => {
            log::warn!(
                "in-flight requests were not drained in {}",
                humantime_serde::re::humantime::format_duration(drain_timeout),
            );
            Ok(())
        }
    }
}

/// Resolves once a SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to listen for SIGINT: {e}");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => drop(s.recv().await),
            Err(e) => {
                log::error!("failed to listen for SIGTERM: {e}");
                future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    log::info!("shutting down, draining in-flight requests");
}
