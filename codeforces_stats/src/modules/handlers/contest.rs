use crate::modules::handlers::{not_found, ApiError};
use crate::modules::models::request::UpcomingContestsQuery;
use crate::modules::stats::service::StatsService;
use axum::extract::{Extension, Query};
use axum::Json;
use codeforces_stats_libs::cache::{read_through, CacheKind, ResponseCache};
use codeforces_stats_libs::codeforces::client::CodeforcesApi;
use codeforces_stats_libs::codeforces::model::Contest;
use std::sync::Arc;

pub async fn upcoming_contests<C>(
    Query(params): Query<UpcomingContestsQuery>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<Vec<Contest>>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let key = params.gym.to_string();
    let contests = read_through(
        &cache,
        CacheKind::UpcomingContests,
        &key,
        service.upcoming_contests(params.gym),
    )
    .await
    .ok_or_else(|| not_found("Upcoming contests data not found"))?;

    Ok(Json(contests))
}
