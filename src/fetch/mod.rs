//! HTTP plumbing for the camp API.
//!
//! Requests go through the [`HttpClient`] trait so credentials can be layered
//! on with wrappers like [`auth::BearerToken`].

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::ApiError;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

fn parse_url(url: &str) -> Result<Url, ApiError> {
    url.parse().map_err(|_| ApiError::InvalidUrl(url.to_string()))
}

/// GETs `url` and decodes the JSON body.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T, ApiError>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    let req = Request::new(Method::GET, parse_url(url)?);
    send_json(client, req).await
}

/// POSTs `body` as JSON to `url` and decodes the JSON response.
pub async fn post_json<C, B, T>(client: &C, url: &str, body: &B) -> Result<T, ApiError>
where
    C: HttpClient,
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let payload = serde_json::to_vec(body)
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {e}")))?;

    let mut req = Request::new(Method::POST, parse_url(url)?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(payload.into());

    send_json(client, req).await
}

async fn send_json<C, T>(client: &C, req: Request) -> Result<T, ApiError>
where
    C: HttpClient,
    T: DeserializeOwned,
{
    let method = req.method().clone();
    let url = req.url().clone();

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(%method, %url, %status, "HTTP response");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, &body));
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")))
}
