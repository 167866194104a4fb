use std::{future, io, sync::OnceLock, time};

use application::{router, Args, Config};
use axum::extract::MatchedPath;
use axum_client_ip::InsecureClientIp;
use service::{
    command::SeedSampleRentals,
    infra::{Nominatim, Sqlite},
    Command as _, Service,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

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
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
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
        server,
        database,
        geocoding,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let sqlite = Sqlite::new(&database.path).await.map_err(|e| {
        log::error!(
            "failed to open `Sqlite` database at `{}`: {e}",
            database.path.display(),
        );
    })?;
    sqlite.migrate().await.map_err(|e| {
        log::error!("failed to run database migrations: {e}");
    })?;

    if geocoding.api_key.is_none() {
        log::info!("no geocoding API key configured, using keyless service");
    }
    let service_config = service::Config::from(&geocoding);
    let nominatim = Nominatim::new(geocoding.into()).map_err(|e| {
        log::error!("failed to initialize `Nominatim` geocoder: {e}");
    })?;

    let service = Service::new(service_config, sqlite.clone(), nominatim);

    if database.seed_sample_data {
        _ = service.execute(SeedSampleRentals).await.map_err(|e| {
            log::error!("failed to seed sample rentals: {e}");
        })?;
    }

    let origins = if server.cors.origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            server
                .cors
                .origins
                .iter()
                .map(|origin| {
                    origin.parse::<http::header::HeaderValue>().map_err(|e| {
                        log::error!(
                            "`{origin}` is not current CORS origin: {e}",
                        );
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        )
    };
    let cors = CorsLayer::new()
        .allow_methods([
            http::Method::DELETE,
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
            http::Method::PUT,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(origins);

    let app = router(service)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(cors)
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
                        http.host = r.uri().host(),
                        http.method = r.method().as_str(),
                        http.route = r
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.scheme = r
                            .uri()
                            .scheme()
                            .map(http::uri::Scheme::as_str),
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

                        if r.status().is_server_error()
                            || r.status().is_client_error()
                        {
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

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| log::error!("webserver failed: {e}"));

    sqlite.close().await;
    log::info!("database closed, shutting down");

    served
}

/// Resolves once `Ctrl+C` is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
        future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}
