use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::error::ApiError;
use crate::fetch::auth::BearerToken;
use crate::fetch::{BasicClient, HttpClient, fetch_json, post_json};
use crate::scores::{ScoreRecord, decode_records};
use crate::services::scores_api::{LoginGrant, ScoresApi};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<UserInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    username: Option<String>,
    current_shift: Option<u32>,
}

/// [`ScoresApi`] over the camp's JSON HTTP API.
pub struct CampApiClient<C = BasicClient> {
    base_url: String,
    http: C,
}

impl CampApiClient<BasicClient> {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::with_http(base_url, BasicClient::new()?))
    }
}

impl<C: HttpClient> CampApiClient<C> {
    pub fn with_http(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl<C: HttpClient> ScoresApi for CampApiClient<C> {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: LoginResponse =
            post_json(&self.http, &self.url("/auth/login"), &request).await?;

        if response.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response carried an empty token".into(),
            ));
        }

        let (username, shift) = match response.user {
            Some(user) => (user.username, user.current_shift),
            None => (None, None),
        };
        let username = username.unwrap_or_else(|| credentials.username().to_string());

        info!(username = %username, shift, "Logged in");
        Ok(LoginGrant {
            token: response.token,
            username,
            shift,
        })
    }

    async fn shift_scores(&self, token: &str, shift: u32) -> Result<Vec<ScoreRecord>, ApiError> {
        let client = BearerToken::new(&self.http, token)?;
        let url = self.url(&format!("/shifts/{shift}/tents"));

        // The backend answers `null` for a shift with no scores yet.
        let values: Option<Vec<serde_json::Value>> = fetch_json(&client, &url).await?;
        let records = decode_records(values);

        debug!(shift, count = records.len(), "Fetched tent scores");
        Ok(records)
    }
}
