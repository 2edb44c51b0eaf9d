use crate::modules::models::response::UserAllStats;
use chrono::Utc;
use codeforces_stats_libs::codeforces::client::CodeforcesApi;
use codeforces_stats_libs::codeforces::model::{Contest, ContestPhase, RatingChange, UserInfo};
use codeforces_stats_libs::pacer::RequestPacer;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Contest participation data not available for {handle}")]
pub struct ParticipationUnavailable {
    pub handle: String,
}

/// Aggregation layer over the upstream API. Fetch failures are swallowed here
/// and reported as absent values; handlers decide the HTTP status.
pub struct StatsService<C> {
    client: C,
    pacer: Arc<RequestPacer>,
}

impl<C> StatsService<C>
where
    C: CodeforcesApi + Sync + Send,
{
    pub fn new(client: C, pacer: Arc<RequestPacer>) -> Self {
        StatsService { client, pacer }
    }

    /// Fetches profiles for the given handles with a single upstream call.
    ///
    /// The upstream claims its `result` array matches input order but that is
    /// not relied on: the reply is re-keyed by case-insensitive handle and
    /// emitted in request order. Requested handles missing from the reply are
    /// skipped; when none remain the whole fetch counts as absent.
    pub async fn user_info(&self, handles: &[String]) -> Option<Vec<UserInfo>> {
        let result = match self.client.user_info(handles).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("user.info request failed cause: {:?}", e);
                return None;
            }
        };

        let mut by_handle: HashMap<String, UserInfo> = result
            .into_iter()
            .map(|user| (user.handle.to_lowercase(), user))
            .collect();
        let users: Vec<UserInfo> = handles
            .iter()
            .filter_map(|handle| by_handle.remove(&handle.to_lowercase()))
            .collect();

        if users.is_empty() {
            None
        } else {
            Some(users)
        }
    }

    pub async fn rating_history(&self, handle: &str) -> Option<Vec<RatingChange>> {
        match self.client.user_rating(handle).await {
            Ok(changes) => Some(changes),
            Err(e) => {
                tracing::error!("user.rating request failed for {} cause: {:?}", handle, e);
                None
            }
        }
    }

    /// Number of distinct solved problems, keyed by (contestId, index).
    /// Duplicate accepted submissions to the same problem count once.
    pub async fn solved_count(&self, handle: &str) -> Option<usize> {
        let submissions = match self.client.user_status(handle).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::error!("user.status request failed for {} cause: {:?}", handle, e);
                return None;
            }
        };

        let solved: HashSet<(Option<i64>, String)> = submissions
            .iter()
            .filter(|s| s.verdict.as_deref() == Some("OK"))
            .map(|s| (s.problem.contest_id, s.problem.index.clone()))
            .collect();

        Some(solved.len())
    }

    /// Contests whose phase is BEFORE and whose start time is strictly in the
    /// future at call time.
    pub async fn upcoming_contests(&self, gym: bool) -> Option<Vec<Contest>> {
        let contests = match self.client.contest_list(gym).await {
            Ok(contests) => contests,
            Err(e) => {
                tracing::error!("contest.list request failed cause: {:?}", e);
                return None;
            }
        };

        let now = Utc::now().timestamp();
        Some(
            contests
                .into_iter()
                .filter(|c| {
                    c.phase == ContestPhase::Before
                        && c.start_time_seconds.map_or(false, |start| start > now)
                })
                .collect(),
        )
    }

    /// Distinct contest ids the user has submitted in. The call is gated by
    /// the shared pacer because `user.status` is the rate-limited endpoint
    /// this service hits in loops.
    ///
    /// `None` means the fetch failed; a user who never submitted gets
    /// `Some(empty)`. The two outcomes are deliberately kept apart.
    pub async fn participated_contests(&self, handle: &str) -> Option<BTreeSet<i64>> {
        self.pacer.acquire().await;

        let submissions = match self.client.user_status(handle).await {
            Ok(submissions) => submissions,
            Err(e) => {
                tracing::error!("user.status request failed for {} cause: {:?}", handle, e);
                return None;
            }
        };

        Some(submissions.iter().filter_map(|s| s.contest_id).collect())
    }

    /// Full profile plus derived statistics for a single handle.
    ///
    /// The profile fetch validates the handle and is fatal when absent. The
    /// three derived fetches are independent and run concurrently; each one
    /// degrades on its own (count 0 / count 0 / null history) without failing
    /// the aggregation.
    pub async fn all_stats(&self, handle: &str) -> Option<UserAllStats> {
        let handles = [handle.to_string()];
        let user = self.user_info(&handles).await?.into_iter().next()?;

        let (contests, solved, rating_history) = tokio::join!(
            self.participated_contests(handle),
            self.solved_count(handle),
            self.rating_history(handle),
        );

        Some(UserAllStats {
            user,
            contests_count: contests.map(|c| c.len()).unwrap_or(0),
            solved_problems_count: solved.unwrap_or(0),
            rating_history,
        })
    }

    /// Intersection of the participated-contest sets of all given users.
    ///
    /// Fetches run sequentially on purpose: the pacer spaces them to honor
    /// the upstream rate limit. A failed fetch aborts with the offending
    /// handle; a user with zero participated contests short-circuits to the
    /// empty intersection.
    pub async fn common_contests(
        &self,
        handles: &[String],
    ) -> Result<BTreeSet<i64>, ParticipationUnavailable> {
        let mut sets: Vec<BTreeSet<i64>> = Vec::with_capacity(handles.len());
        for handle in handles {
            let contests = self.participated_contests(handle).await.ok_or_else(|| {
                ParticipationUnavailable {
                    handle: handle.clone(),
                }
            })?;
            if contests.is_empty() {
                return Ok(BTreeSet::new());
            }
            sets.push(contests);
        }

        let mut sets = sets.into_iter();
        let first = sets.next().unwrap_or_default();
        Ok(sets.fold(first, |common, set| {
            common.intersection(&set).copied().collect()
        }))
    }
}
