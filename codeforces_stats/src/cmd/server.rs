use crate::modules::handlers::{contest, docs, user};
use crate::modules::stats::service::StatsService;
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use codeforces_stats_libs::cache::ResponseCache;
use codeforces_stats_libs::codeforces::client::{CodeforcesApi, RestCodeforcesClient};
use codeforces_stats_libs::pacer::RequestPacer;
use std::{
    env,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tokio::time::Duration;
use tower_http::trace::TraceLayer;

/// Codeforces allows roughly one request per two seconds for the expensive
/// endpoint classes; `user.status` calls are spaced accordingly.
const UPSTREAM_REQUEST_INTERVAL: Duration = Duration::from_secs(2);

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    host: Option<IpAddr>,
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let api_url = env::var("CODEFORCES_API_URL").unwrap_or_else(|_| {
        tracing::warn!("CODEFORCES_API_URL environment variable is not set. Default value `https://codeforces.com/api` will be used.");
        String::from("https://codeforces.com/api")
    });
    let ttl = env::var("CACHE_TTL_SECONDS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_SECONDS);

    let client = RestCodeforcesClient::new(&api_url).with_context(|| {
        let message = "couldn't create Codeforces API client. check the value of the CODEFORCES_API_URL environment variable.";
        tracing::error!(message);
        format!("{}", message)
    })?;
    let pacer = Arc::new(RequestPacer::new(UPSTREAM_REQUEST_INTERVAL));
    let service = Arc::new(StatsService::new(client, pacer));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(ttl)));

    let sweeper = Arc::clone(&cache);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweeper.expire().await;
        }
    });

    let app = create_router(service, cache);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let host = args.host.unwrap_or_else(|| IpAddr::from([0, 0, 0, 0]));
    let addr = SocketAddr::new(host, port);
    tracing::info!("Server start at {}", addr);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

pub fn create_router<C>(service: Arc<StatsService<C>>, cache: Arc<ResponseCache>) -> Router
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    Router::new()
        .route("/", routing::get(docs))
        .route("/contests/upcoming", routing::get(contest::upcoming_contests::<C>))
        .route("/multi/:handles", routing::get(user::users_info::<C>))
        .route(
            "/users/common-contests/:handles",
            routing::get(user::common_contests::<C>),
        )
        .route("/:handle", routing::get(user::user_all_stats::<C>))
        .route("/:handle/basic", routing::get(user::user_basic_info::<C>))
        .route("/:handle/rating", routing::get(user::user_rating::<C>))
        .route("/:handle/solved", routing::get(user::solved_problems::<C>))
        .route(
            "/:handle/contests",
            routing::get(user::contests_participated::<C>),
        )
        .layer(Extension(service))
        .layer(Extension(cache))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
