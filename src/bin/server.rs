use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Extension, Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledger_insights::{
    AppState, UserId, build_router, exclusions::ExclusionGroups, graceful_shutdown,
};

/// The JSON API server for ledger_insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// File path to a JSON object that maps exclusion group names to category guids.
    #[arg(long)]
    exclusions_path: Option<PathBuf>,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The user whose data every request is served for.
    #[arg(long, default_value_t = 1)]
    user_id: i64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let exclusion_groups = match &args.exclusions_path {
        Some(path) => ExclusionGroups::load(path).expect("Could not load exclusion groups."),
        None => ExclusionGroups::default(),
    };
    tracing::info!(
        "Loaded exclusion groups: {:?}",
        exclusion_groups.names().collect::<Vec<_>>()
    );

    let conn = Connection::open(&args.db_path).expect("Could not open database.");
    let state = AppState::new(conn, exclusion_groups).expect("Could not initialize database.");

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(Extension(UserId::new(args.user_id)));

    #[cfg(debug_assertions)]
    let router = router.layer(axum::middleware::from_fn(
        ledger_insights::logging_middleware,
    ));

    let router = add_tracing_layer(router);

    tracing::info!(
        "HTTP server listening on {addr}, serving user {}",
        args.user_id
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

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
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
