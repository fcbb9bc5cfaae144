use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends prepared requests. Wrappers such as [`super::auth::BearerToken`]
/// decorate another client to add credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl<'a, C: HttpClient + ?Sized> HttpClient for &'a C {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req).await
    }
}
