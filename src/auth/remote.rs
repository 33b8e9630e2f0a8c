// src/auth/remote.rs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
    auth::provider::IdentityProvider,
    error::AppError,
    models::user::{AuthPayload, Session, SignInRequest, SignUpRequest, User, UserUpdate},
    response::Envelope,
};

/// Identity provider reached over HTTP, speaking the `/api/auth` routes.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/auth{}", self.base_url, path)
    }

    /// Sends the request and unwraps the `{data, error}` envelope.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, AppError> {
        let response = request.send().await?;
        let status = response.status();

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            AppError::Provider(format!("Unreadable provider response ({}): {}", status, e))
        })?;

        envelope.into_api_response().into_result()
    }

    async fn call_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        self.call(request)
            .await?
            .ok_or_else(|| AppError::Provider("Provider response carried no data".to_string()))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthPayload, AppError> {
        self.call_data(self.client.post(self.url("/signin")).json(request))
            .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthPayload, AppError> {
        self.call_data(self.client.post(self.url("/signup")).json(request))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        self.call::<serde_json::Value>(
            self.client
                .post(self.url("/signout"))
                .bearer_auth(access_token),
        )
        .await
        .map(|_| ())
    }

    async fn get_session(&self, access_token: &str) -> Result<Session, AppError> {
        self.call_data(self.client.get(self.url("/session")).bearer_auth(access_token))
            .await
    }

    async fn update_user(&self, access_token: &str, update: &UserUpdate) -> Result<User, AppError> {
        self.call_data(
            self.client
                .put(self.url("/user"))
                .bearer_auth(access_token)
                .json(update),
        )
        .await
    }
}
