use crate::codeforces::model::*;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::Duration;

type Result<T> = std::result::Result<T, CodeforcesError>;

#[derive(Debug, Error)]
pub enum CodeforcesError {
    #[error("failed to request to the Codeforces API")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid Codeforces API url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("the Codeforces API reported failure: {0}")]
    ApiFailure(String),
}

/// The upstream API surface this service consumes. Kept as a trait so the
/// aggregation layer can be exercised against fixture data.
#[async_trait]
pub trait CodeforcesApi {
    async fn user_info(&self, handles: &[String]) -> Result<Vec<UserInfo>>;
    async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>>;
    async fn user_status(&self, handle: &str) -> Result<Vec<Submission>>;
    async fn contest_list(&self, gym: bool) -> Result<Vec<Contest>>;
}

pub struct RestCodeforcesClient {
    user_info_url: Url,
    user_rating_url: Url,
    user_status_url: Url,
    contest_list_url: Url,
    client: Client,
}

impl RestCodeforcesClient {
    /// `api_url` is the API root, e.g. `https://codeforces.com/api`.
    pub fn new(api_url: &str) -> Result<Self> {
        let mut base = Url::parse(api_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let user_info_url = base.join("user.info")?;
        let user_rating_url = base.join("user.rating")?;
        let user_status_url = base.join("user.status")?;
        let contest_list_url = base.join("contest.list")?;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(RestCodeforcesClient {
            user_info_url,
            user_rating_url,
            user_status_url,
            contest_list_url,
            client,
        })
    }

    /// The upstream returns its `{status, result|comment}` envelope with 4xx
    /// status codes as well, so the body is parsed before the HTTP status is
    /// considered.
    async fn call<T>(&self, url: &Url, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let res = self.client.get(url.clone()).query(params).send().await?;
        let body: ApiResponse<T> = res.json().await?;

        if body.status == "OK" {
            body.result.ok_or_else(|| {
                CodeforcesError::ApiFailure(String::from("status OK but result is missing"))
            })
        } else {
            let comment = body.comment.unwrap_or_default();
            Err(CodeforcesError::ApiFailure(comment))
        }
    }
}

#[async_trait]
impl CodeforcesApi for RestCodeforcesClient {
    async fn user_info(&self, handles: &[String]) -> Result<Vec<UserInfo>> {
        let handles = handles.join(";");
        self.call(&self.user_info_url, &[("handles", handles)])
            .await
    }

    async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>> {
        self.call(&self.user_rating_url, &[("handle", handle.to_string())])
            .await
    }

    async fn user_status(&self, handle: &str) -> Result<Vec<Submission>> {
        self.call(&self.user_status_url, &[("handle", handle.to_string())])
            .await
    }

    async fn contest_list(&self, gym: bool) -> Result<Vec<Contest>> {
        self.call(&self.contest_list_url, &[("gym", gym.to_string())])
            .await
    }
}
