use codeforces_stats_libs::codeforces::model::{RatingChange, UserInfo};
use serde::{Deserialize, Serialize};

/// Every client-visible failure body is this single-field shape.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Full profile merged with the derived statistics. `rating_history` stays
/// null (not an empty list) when its fetch degraded.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserAllStats {
    #[serde(flatten)]
    pub user: UserInfo,
    pub contests_count: usize,
    pub solved_problems_count: usize,
    pub rating_history: Option<Vec<RatingChange>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SolvedProblemsCount {
    pub handle: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ParticipatedContests {
    pub handle: String,
    pub contests: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CommonContests {
    pub handles: Vec<String>,
    pub common_contests: Vec<i64>,
}
