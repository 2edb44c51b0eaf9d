use crate::modules::handlers::{bad_gateway, bad_request, not_found, ApiError};
use crate::modules::models::request::HandleList;
use crate::modules::models::response::{
    CommonContests, ParticipatedContests, SolvedProblemsCount, UserAllStats,
};
use crate::modules::stats::service::StatsService;
use axum::extract::{Extension, Path};
use axum::Json;
use codeforces_stats_libs::cache::{read_through, CacheKind, ResponseCache};
use codeforces_stats_libs::codeforces::client::CodeforcesApi;
use codeforces_stats_libs::codeforces::model::{RatingChange, UserInfo};
use std::sync::Arc;

const EMPTY_HANDLE_LIST: &str = "No valid handles provided";

pub async fn user_all_stats<C>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<UserAllStats>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let stats = read_through(
        &cache,
        CacheKind::AllStats,
        &handle,
        service.all_stats(&handle),
    )
    .await
    .ok_or_else(|| not_found(format!("Stats not found for {}", handle)))?;

    Ok(Json(stats))
}

pub async fn user_basic_info<C>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<UserInfo>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let fetch = async {
        service
            .user_info(std::slice::from_ref(&handle))
            .await
            .and_then(|users| users.into_iter().next())
    };
    let user = read_through(&cache, CacheKind::UserInfo, &handle, fetch)
        .await
        .ok_or_else(|| not_found(format!("User information not found for {}", handle)))?;

    Ok(Json(user))
}

pub async fn users_info<C>(
    Path(handles): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<Vec<UserInfo>>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let list = HandleList::parse(&handles).map_err(|_| bad_request(EMPTY_HANDLE_LIST))?;

    let key = list.handles.join(";");
    let users = read_through(
        &cache,
        CacheKind::MultiUserInfo,
        &key,
        service.user_info(&list.handles),
    )
    .await
    .ok_or_else(|| not_found("User information not found"))?;

    Ok(Json(users))
}

pub async fn user_rating<C>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<Vec<RatingChange>>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let history = read_through(
        &cache,
        CacheKind::RatingHistory,
        &handle,
        service.rating_history(&handle),
    )
    .await
    .ok_or_else(|| not_found(format!("Rating history not found for {}", handle)))?;

    Ok(Json(history))
}

pub async fn solved_problems<C>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<SolvedProblemsCount>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let fetch = async {
        service
            .solved_count(&handle)
            .await
            .map(|count| SolvedProblemsCount {
                handle: handle.clone(),
                count,
            })
    };
    let solved = read_through(&cache, CacheKind::SolvedCount, &handle, fetch)
        .await
        .ok_or_else(|| not_found(format!("Solved problem count not found for {}", handle)))?;

    Ok(Json(solved))
}

pub async fn contests_participated<C>(
    Path(handle): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<ParticipatedContests>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    // An empty participation set is reported as absent on this route.
    let fetch = async {
        service
            .participated_contests(&handle)
            .await
            .filter(|contests| !contests.is_empty())
            .map(|contests| ParticipatedContests {
                handle: handle.clone(),
                contests: contests.into_iter().collect(),
            })
    };
    let participated = read_through(&cache, CacheKind::ParticipatedContests, &handle, fetch)
        .await
        .ok_or_else(|| {
            not_found(format!(
                "Contest participation data not found for {}",
                handle
            ))
        })?;

    Ok(Json(participated))
}

pub async fn common_contests<C>(
    Path(handles): Path<String>,
    Extension(service): Extension<Arc<StatsService<C>>>,
    Extension(cache): Extension<Arc<ResponseCache>>,
) -> Result<Json<CommonContests>, ApiError>
where
    C: CodeforcesApi + Sync + Send + 'static,
{
    let list = HandleList::parse(&handles).map_err(|_| bad_request(EMPTY_HANDLE_LIST))?;
    let key = list.handles.join(";");

    match service.common_contests(&list.handles).await {
        Ok(common) => {
            let response = CommonContests {
                handles: list.handles,
                common_contests: common.into_iter().collect(),
            };
            cache
                .store(CacheKind::CommonContests, &key, &response)
                .await;
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("common contests aggregation failed cause: {}", e);
            match cache.fetch(CacheKind::CommonContests, &key).await {
                Some(response) => Ok(Json(response)),
                None => Err(bad_gateway(e)),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::cmd::server::create_router;
    use crate::modules::stats::service::testing::{
        accepted, rating_change, service, user, FixtureApi,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use codeforces_stats_libs::cache::ResponseCache;
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::time::Duration;
    use tower::ServiceExt;

    fn router(api: FixtureApi) -> axum::Router {
        create_router(
            Arc::new(service(api)),
            Arc::new(ResponseCache::new(Duration::from_secs(300))),
        )
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn basic_info_serializes_missing_fields_as_null() {
        let app = router(FixtureApi::new().with_user(user("tourist", Some(3800))));

        let (status, body) = get(app, "/tourist/basic").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], "tourist");
        assert_eq!(body["rating"], 3800);
        assert!(body["country"].is_null());
        assert!(body["organization"].is_null());
    }

    #[tokio::test]
    async fn basic_info_of_unknown_handle_is_404_with_detail() {
        let app = router(FixtureApi::new());

        let (status, body) = get(app, "/nosuchuser/basic").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "User information not found for nosuchuser");
    }

    #[tokio::test]
    async fn all_stats_route_merges_profile_and_counts() {
        let api = FixtureApi::new()
            .with_user(user("tourist", Some(3800)))
            .with_submissions("tourist", vec![accepted(1, 1, "A"), accepted(2, 2, "B")])
            .with_rating("tourist", vec![rating_change("tourist", 1, 1500, 1700)]);

        let (status, body) = get(router(api), "/tourist").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], "tourist");
        assert_eq!(body["contests_count"], 2);
        assert_eq!(body["solved_problems_count"], 2);
        assert_eq!(body["rating_history"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn all_stats_route_of_unknown_handle_is_404() {
        let (status, body) = get(router(FixtureApi::new()), "/nosuchuser").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Stats not found for nosuchuser");
    }

    #[tokio::test]
    async fn multi_route_accepts_both_separators() {
        let api = || {
            FixtureApi::new()
                .with_user(user("alice", Some(1500)))
                .with_user(user("bob", Some(1600)))
        };

        let (_, commas) = get(router(api()), "/multi/alice,bob").await;
        let (_, semicolons) = get(router(api()), "/multi/alice;bob").await;

        assert_eq!(commas, semicolons);
        assert_eq!(commas.as_array().unwrap().len(), 2);
        assert_eq!(commas[0]["handle"], "alice");
        assert_eq!(commas[1]["handle"], "bob");
    }

    #[tokio::test]
    async fn multi_route_with_no_valid_handles_is_400() {
        let (status, body) = get(router(FixtureApi::new()), "/multi/;,;").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No valid handles provided");
    }

    #[tokio::test]
    async fn rating_route_returns_the_history() {
        let api = FixtureApi::new().with_rating(
            "tourist",
            vec![
                rating_change("tourist", 1, 1500, 1700),
                rating_change("tourist", 2, 1700, 1850),
            ],
        );

        let (status, body) = get(router(api), "/tourist/rating").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["oldRating"], 1500);
        assert_eq!(body[1]["newRating"], 1850);
    }

    #[tokio::test]
    async fn solved_route_reports_handle_and_count() {
        let api = FixtureApi::new()
            .with_submissions("tourist", vec![accepted(1, 1, "A"), accepted(2, 1, "A")]);

        let (status, body) = get(router(api), "/tourist/solved").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], "tourist");
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn contests_route_is_404_for_empty_participation() {
        let api = FixtureApi::new().with_submissions("newcomer", vec![]);

        let (status, body) = get(router(api), "/newcomer/contests").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["detail"],
            "Contest participation data not found for newcomer"
        );
    }

    #[tokio::test]
    async fn common_contests_route_reports_handles_and_intersection() {
        let api = FixtureApi::new()
            .with_submissions("alice", vec![accepted(1, 1, "A"), accepted(2, 2, "A")])
            .with_submissions("bob", vec![accepted(3, 2, "B"), accepted(4, 3, "B")]);

        let (status, body) = get(router(api), "/users/common-contests/alice;bob").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handles"], serde_json::json!(["alice", "bob"]));
        assert_eq!(body["common_contests"], serde_json::json!([2]));
    }

    #[tokio::test]
    async fn common_contests_route_maps_fetch_failure_to_502() {
        let api = FixtureApi::new().with_submissions("alice", vec![accepted(1, 1, "A")]);

        let (status, body) = get(router(api), "/users/common-contests/alice;ghost").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["detail"],
            "Contest participation data not available for ghost"
        );
    }
}
