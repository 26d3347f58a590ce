use std::{error::Error, fs::OpenOptions, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use salesboard::{
    AppState, PaginationConfig, build_router, graceful_shutdown, initialize_db, logging_middleware,
    transaction::{count_transactions, fetch_seed_records, parse_seed_records, seed_transactions},
};

/// The REST API server for salesboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON product feed to replace the stored transactions with on start up.
    #[arg(long, conflicts_with = "seed_url")]
    seed_path: Option<String>,

    /// URL of a JSON product feed to replace the stored transactions with on start up.
    #[arg(long)]
    seed_url: Option<String>,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let conn = Connection::open(&args.db_path)?;

    if let Some(seed_path) = &args.seed_path {
        initialize_db(&conn)?;
        let feed = std::fs::read_to_string(seed_path)?;
        let count = seed_transactions(parse_seed_records(&feed)?, &conn)?;
        tracing::info!("Loaded {count} transactions from {seed_path}");
    } else if let Some(seed_url) = &args.seed_url {
        initialize_db(&conn)?;
        let count = seed_transactions(fetch_seed_records(seed_url).await?, &conn)?;
        tracing::info!("Loaded {count} transactions from {seed_url}");
    }

    let state = AppState::new(conn, PaginationConfig::default())?;
    {
        let connection = state
            .db_connection
            .lock()
            .map_err(|error| format!("could not lock database connection: {error}"))?;
        tracing::info!("Serving {} transactions", count_transactions(&connection)?);
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Logs to stdout at the level set by `RUST_LOG` (default `info`) and to `log_path` at `debug`.
fn setup_logging(log_path: &str) -> Result<(), Box<dyn Error>> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

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
                .with_filter(stdout_filter)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
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
        // By default, `TraceLayer` will log 5xx responses but the error type
        // already logs the cause of those, so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
