use std::{
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use money_tracker::{
    AppState, build_router, ensure_demo_user, graceful_shutdown, logging_middleware,
    stores::{create_app_state, create_memory_app_state},
};

/// Where users and transactions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// A SQLite database file, see `--db-path`.
    Sqlite,
    /// Process memory. All data is lost when the server stops.
    Memory,
}

/// The REST API server for money_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The secret for signing access tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, value_parser = parse_secret)]
    jwt_secret: String,

    /// Where to keep users and transactions.
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// File path to the application SQLite database. Required with `--store sqlite`.
    #[arg(long, env = "DB_PATH")]
    db_path: Option<PathBuf>,

    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 4040)]
    port: u16,

    /// An origin that browsers may call the API from, e.g. "http://localhost:5173".
    /// May be repeated or given as a comma separated list.
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// The password of the demo account. A random password is used if not set,
    /// so the demo account can only be used through the demo log-in route.
    #[arg(long, env = "DEMO_PASSWORD", hide_env_values = true)]
    demo_password: Option<String>,

    /// File path for the debug log.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: PathBuf,
}

fn parse_secret(secret: &str) -> Result<String, String> {
    if secret.trim().is_empty() {
        Err("the JWT secret must not be empty".to_owned())
    } else {
        Ok(secret.to_owned())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not open log file {}: {error}", args.log_path.display());
        return ExitCode::FAILURE;
    }

    let state = match create_state(&args) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = ensure_demo_user(
        state.user_store.as_ref(),
        state.demo_password.as_deref(),
        state.password_cost,
    ) {
        tracing::warn!("Could not create the demo user at start-up: {error}");
    }

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_cors_layer(router, &args.allowed_origins);
    let router = add_tracing_layer(router);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from((args.host, args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn create_state(args: &Args) -> Result<AppState, String> {
    match args.store {
        StoreKind::Sqlite => {
            let db_path = args
                .db_path
                .as_ref()
                .ok_or("--db-path is required with --store sqlite")?;
            tracing::info!("Using the SQLite store at {}", db_path.display());

            let connection = Connection::open(db_path)
                .map_err(|error| format!("could not open {}: {error}", db_path.display()))?;

            create_app_state(connection, &args.jwt_secret, args.demo_password.clone())
                .map_err(|error| error.to_string())
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store, data will be lost on shutdown");

            create_memory_app_state(&args.jwt_secret, args.demo_password.clone())
                .map_err(|error| error.to_string())
        }
    }
}

fn setup_logging(log_path: &Path) -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_cors_layer(router: Router, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse() {
            Ok(origin) => Some(origin),
            Err(error) => {
                tracing::warn!("Ignoring invalid allowed origin {origin:?}: {error}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return router;
    }

    tracing::info!("Allowing cross-origin requests from {origins:?}");

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true);

    router.layer(cors)
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
